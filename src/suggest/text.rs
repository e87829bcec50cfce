//! Tokenizing and display helpers shared by the miner and the ranker

use once_cell::sync::Lazy;
use regex::Regex;

/// A run of word characters: letters and digits in any script, apostrophes
/// and hyphens
static WORD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}'\-]+").unwrap());

/// Shortest word, in characters, that counts for suggestions
pub const MIN_WORD_CHARS: usize = 2;

/// One whitespace-separated chunk of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Chunk with outer punctuation stripped, original casing
    pub text: String,
    pub lower: String,
    pub is_word: bool,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '-'
}

/// Trim leading and trailing characters that are not letters, digits,
/// apostrophes or hyphens
pub fn strip_punct(s: &str) -> &str {
    s.trim_matches(|c: char| !is_word_char(c))
}

/// Collapse whitespace runs and strip outer punctuation
pub fn normalize_phrase(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    strip_punct(&collapsed).to_string()
}

fn is_word(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric) && text.chars().count() >= MIN_WORD_CHARS
}

/// Split a field on whitespace runs, flagging the chunks that are real words.
/// Punctuation inside a chunk is kept, so `St.Pauli` and `2:1` stay whole.
pub fn lex(field: &str) -> Vec<Token> {
    field
        .split_whitespace()
        .map(|chunk| {
            let text = strip_punct(chunk).to_string();
            let lower = text.to_lowercase();
            Token {
                is_word: is_word(&text),
                text,
                lower,
            }
        })
        .collect()
}

/// Number of words of at least `MIN_WORD_CHARS` characters, splitting on
/// anything that is not a word character
pub fn word_count(phrase: &str) -> usize {
    WORD_RUN
        .find_iter(phrase)
        .filter(|m| is_word(m.as_str()))
        .count()
}

/// Upper-case the first letter of every word. A letter starts a word when
/// the character before it is neither alphanumeric nor an apostrophe, so
/// `rock-n-roll` becomes `Rock-N-Roll` and `don't` stays `Don't`.
pub fn to_nice(phrase: &str) -> String {
    let mut out = String::with_capacity(phrase.len());
    let mut prev: Option<char> = None;
    for c in phrase.chars() {
        let starts_word = match prev {
            None => true,
            Some(p) => !(p.is_alphanumeric() || p == '\''),
        };
        if starts_word && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}
