use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cache::Cacheable;
use crate::models::NormalizedDocument;

/// Facet key for the stock collection
pub const FACET_STOCK: &str = "st";
/// Facet key for the sport collection
pub const FACET_SPORT: &str = "sp";
/// Facet key for documents with any other collection value
pub const FACET_OTHER: &str = "other";
/// Facet key for documents without a collection field
pub const FACET_UNKNOWN: &str = "unknown";

/// Per-collection document counts over the whole filtered result set.
///
/// `st` and `sp` are always present; `other` and `unknown` only when
/// non-zero. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetCounts(BTreeMap<String, u64>);

impl FacetCounts {
    pub fn new(stock: u64, sport: u64, other: u64, unknown: u64) -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(FACET_STOCK.to_string(), stock);
        counts.insert(FACET_SPORT.to_string(), sport);
        if other > 0 {
            counts.insert(FACET_OTHER.to_string(), other);
        }
        if unknown > 0 {
            counts.insert(FACET_UNKNOWN.to_string(), unknown);
        }
        Self(counts)
    }

    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// One page of search results plus facet counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub page: u32,

    #[serde(rename = "size")]
    pub page_size: u32,

    pub total: u64,

    #[serde(rename = "byDb", default)]
    pub facet_counts: FacetCounts,

    #[serde(rename = "results", default)]
    pub documents: Vec<NormalizedDocument>,

    #[serde(rename = "_cached", default)]
    pub served_from_cache: bool,

    #[serde(rename = "_stale", default)]
    pub is_stale: bool,
}

impl Cacheable for SearchResponse {
    fn mark_cached(&mut self) {
        self.served_from_cache = true;
    }

    fn mark_stale(&mut self) {
        self.served_from_cache = true;
        self.is_stale = true;
    }
}

/// Ranked autocomplete phrases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,

    #[serde(rename = "_cached", default)]
    pub served_from_cache: bool,

    #[serde(rename = "_stale", default)]
    pub is_stale: bool,
}

impl SuggestResponse {
    pub fn new(suggestions: Vec<String>) -> Self {
        Self {
            suggestions,
            served_from_cache: false,
            is_stale: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl Cacheable for SuggestResponse {
    fn mark_cached(&mut self) {
        self.served_from_cache = true;
    }

    fn mark_stale(&mut self) {
        self.served_from_cache = true;
        self.is_stale = true;
    }
}
