use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::Collection;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 40;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Shortest prefix (in characters) that produces suggestions
pub const MIN_PREFIX_CHARS: usize = 2;

/// Collapse runs of whitespace to a single space and trim both ends
pub fn sanitize_term(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a comma separated collection filter (`st,sp`, `stock`, ...) into
/// the canonical index values, sorted and deduplicated
pub fn parse_collection_filter(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| Collection::from_raw(v).index_value().to_string())
        .collect()
}

/// Parse an ISO `YYYY-MM-DD` date, ignoring anything unparseable
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "Ignoring unparseable date filter");
            None
        }
    }
}

/// A normalized free-text search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sanitized search term (may be empty)
    pub term: String,

    /// 1-based page number
    pub page: u32,

    /// Results per page, within `1..=MAX_PAGE_SIZE`
    pub page_size: u32,

    /// Canonical collection values to restrict to
    pub db_filter: BTreeSet<String>,

    /// Inclusive lower date bound
    pub date_start: Option<NaiveDate>,

    /// Inclusive upper date bound
    pub date_end: Option<NaiveDate>,

    /// Skip the happy-path cache read and write
    pub bypass_cache: bool,
}

impl SearchRequest {
    /// Create a request for the first page of `term`
    pub fn new(term: &str) -> Self {
        Self {
            term: sanitize_term(term),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            db_filter: BTreeSet::new(),
            date_start: None,
            date_end: None,
            bypass_cache: false,
        }
    }

    /// Set the page, clamped to at least 1
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page.clamp(1, u32::MAX as i64) as u32;
        self
    }

    /// Set the page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE as i64) as u32;
        self
    }

    /// Restrict to collections given as a comma separated filter string
    pub fn with_db_filter(mut self, raw: &str) -> Self {
        self.db_filter = parse_collection_filter(raw);
        self
    }

    /// Restrict to an inclusive date range
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }

    pub fn with_bypass_cache(mut self, bypass: bool) -> Self {
        self.bypass_cache = bypass;
        self
    }

    /// Offset of the first hit on this page
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

/// A normalized autocomplete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    /// Sanitized prefix, original casing
    pub prefix: String,

    /// Canonical collection values to restrict to
    pub db_filter: BTreeSet<String>,

    pub date_start: Option<NaiveDate>,

    pub date_end: Option<NaiveDate>,

    pub bypass_cache: bool,
}

impl SuggestRequest {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: sanitize_term(prefix),
            db_filter: BTreeSet::new(),
            date_start: None,
            date_end: None,
            bypass_cache: false,
        }
    }

    pub fn with_db_filter(mut self, raw: &str) -> Self {
        self.db_filter = parse_collection_filter(raw);
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }

    pub fn with_bypass_cache(mut self, bypass: bool) -> Self {
        self.bypass_cache = bypass;
        self
    }

    /// Lower-cased prefix used for matching and cache keys
    pub fn prefix_lower(&self) -> String {
        self.prefix.to_lowercase()
    }

    /// Whether the prefix is long enough to be worth a lookup
    pub fn is_searchable(&self) -> bool {
        self.prefix.chars().count() >= MIN_PREFIX_CHARS
    }
}
