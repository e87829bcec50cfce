//! Mining one- and two-word phrase candidates from document fields

use serde_json::{Map, Value};

use crate::suggest::text::{lex, Token};

/// Text fields phrases are mined from
pub const MINED_FIELDS: [&str; 7] = [
    "title",
    "headline",
    "titel",
    "caption",
    "summary",
    "description",
    "suchtext",
];

/// A lower-cased prefix split into the words that drive mining
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixPattern {
    /// Matches a word starting with the prefix
    Single(String),
    /// Matches an adjacent word pair whose joined form starts with both parts
    Pair(String, String),
}

impl PrefixPattern {
    /// Split a prefix on whitespace. Words past the second are ignored.
    pub fn parse(prefix_lower: &str) -> Option<Self> {
        let mut parts = prefix_lower.split_whitespace();
        let first = parts.next()?.to_string();
        Some(match parts.next() {
            Some(second) => PrefixPattern::Pair(first, second.to_string()),
            None => PrefixPattern::Single(first),
        })
    }
}

fn bigram(a: &Token, b: &Token) -> String {
    format!("{} {}", a.text, b.text)
}

/// Candidates mined from a single field value
pub fn mine_field(field: &str, pattern: &PrefixPattern) -> Vec<String> {
    let tokens = lex(field);
    let words: Vec<&Token> = tokens.iter().filter(|t| t.is_word).collect();
    let mut out = Vec::new();

    match pattern {
        PrefixPattern::Single(prefix) => {
            for (i, word) in words.iter().enumerate() {
                if !word.lower.starts_with(prefix.as_str()) {
                    continue;
                }
                out.push(word.text.clone());
                if i > 0 {
                    out.push(bigram(words[i - 1], word));
                }
                if let Some(next) = words.get(i + 1) {
                    out.push(bigram(word, next));
                }
            }
        }
        PrefixPattern::Pair(first, second) => {
            let wanted = format!("{} {}", first, second);
            for pair in words.windows(2) {
                let joined = format!("{} {}", pair[0].lower, pair[1].lower);
                if joined.starts_with(&wanted) {
                    out.push(bigram(pair[0], pair[1]));
                }
            }
        }
    }

    out
}

/// Candidates mined from every text field of one raw document
pub fn collect_candidates(source: &Map<String, Value>, prefix_lower: &str) -> Vec<String> {
    let Some(pattern) = PrefixPattern::parse(prefix_lower) else {
        return Vec::new();
    };

    MINED_FIELDS
        .iter()
        .filter_map(|name| source.get(*name).and_then(Value::as_str))
        .flat_map(|field| mine_field(field, &pattern))
        .collect()
}
