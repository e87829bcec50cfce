//! Autocomplete suggestions.
//!
//! The top documents matching a phrase-prefix query are mined for one- and
//! two-word phrases around the prefix, which are then counted and ranked.

mod candidates;
mod query;
mod ranker;
mod service;
mod text;

pub use candidates::{collect_candidates, mine_field, PrefixPattern, MINED_FIELDS};
pub use query::{build_suggest_body, SUGGEST_SAMPLE_SIZE, SUGGEST_TERMINATE_AFTER};
pub use ranker::{group_candidates, rank_candidates, rank_suggestions, Candidate, MAX_SUGGESTIONS};
pub use service::SuggestService;
pub use text::{lex, normalize_phrase, strip_punct, to_nice, word_count, Token, MIN_WORD_CHARS};
