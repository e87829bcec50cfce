//! Deduplicating and ordering mined candidates

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::suggest::text::{normalize_phrase, to_nice, word_count};

/// Most suggestions returned for one prefix
pub const MAX_SUGGESTIONS: usize = 8;

/// Candidates sharing one lower-cased form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub normalized_key: String,
    /// First display form seen
    pub display_form: String,
    pub occurrence_count: usize,
    pub word_count: usize,
}

impl Candidate {
    fn display_len(&self) -> usize {
        self.display_form.chars().count()
    }
}

/// Total order: frequency, then longer phrases, then shorter text, then
/// alphabetical
fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.occurrence_count
        .cmp(&a.occurrence_count)
        .then_with(|| b.word_count.cmp(&a.word_count))
        .then_with(|| a.display_len().cmp(&b.display_len()))
        .then_with(|| a.normalized_key.cmp(&b.normalized_key))
}

/// Group raw candidates by their lower-cased normalized form, keeping
/// only phrases of one or two words
pub fn group_candidates<I, S>(candidates: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: Vec<Candidate> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for raw in candidates {
        let display = normalize_phrase(raw.as_ref());
        let words = word_count(&display);
        if words == 0 || words > 2 {
            continue;
        }

        let key = display.to_lowercase();
        match positions.get(&key) {
            Some(&pos) => groups[pos].occurrence_count += 1,
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(Candidate {
                    normalized_key: key,
                    display_form: display,
                    occurrence_count: 1,
                    word_count: words,
                });
            }
        }
    }

    groups
}

/// The top `limit` grouped candidates in rank order
pub fn rank_candidates(mut groups: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    groups.sort_by(rank_order);
    groups.truncate(limit);
    groups
}

/// Rank raw candidates into at most `MAX_SUGGESTIONS` display phrases
pub fn rank_suggestions<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rank_candidates(group_candidates(candidates), MAX_SUGGESTIONS)
        .into_iter()
        .map(|c| to_nice(&c.display_form))
        .collect()
}
