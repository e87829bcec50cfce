//! Deterministic cache keys.
//!
//! Every field of a normalized request appears in the key under a fixed
//! name, URL-encoded, in a fixed order. Equal requests produce equal keys
//! and any field difference produces a different key.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{SearchRequest, SuggestRequest};

/// Namespace shared by every key this service writes
pub const KEY_NAMESPACE: &str = "imago";

/// Bumped whenever the cached payload shape changes
pub const KEY_VERSION: &str = "v1";

fn encode_filter(db_filter: &BTreeSet<String>) -> String {
    db_filter
        .iter()
        .map(|v| urlencoding::encode(v).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

fn encode_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Cache key for a search request. The term keeps its casing.
pub fn search_key(request: &SearchRequest) -> String {
    format!(
        "{}:search:{}:q={}&page={}&size={}&db={}&start={}&end={}",
        KEY_NAMESPACE,
        KEY_VERSION,
        urlencoding::encode(&request.term),
        request.page,
        request.page_size,
        encode_filter(&request.db_filter),
        encode_date(request.date_start),
        encode_date(request.date_end),
    )
}

/// Cache key for a suggestion request. The prefix is lower-cased so
/// `Cat` and `cat` share an entry.
pub fn suggest_key(request: &SuggestRequest) -> String {
    format!(
        "{}:suggest:{}:q={}&db={}&start={}&end={}",
        KEY_NAMESPACE,
        KEY_VERSION,
        urlencoding::encode(&request.prefix_lower()),
        encode_filter(&request.db_filter),
        encode_date(request.date_start),
        encode_date(request.date_end),
    )
}
