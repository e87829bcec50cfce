//! Search query building.
//!
//! Turns a sanitized term plus filters into an Elasticsearch request body:
//! four boosted relevance tiers combined as `should` clauses, non-scoring
//! filters, a relevance-then-date sort, and a `filters` aggregation that
//! buckets the whole filtered set by collection.

use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::BTreeSet;

use crate::models::SearchRequest;

/// Canonical date field
pub const DATE_FIELD: &str = "datum";
/// Collection tag field (`stock`, `sport`, ...)
pub const COLLECTION_FIELD: &str = "db";
/// Numeric media identifier field
pub const MEDIA_ID_FIELD: &str = "bildnummer";

/// Title-like fields
pub const TITLE_FIELDS: [&str; 3] = ["title", "headline", "titel"];
/// Description-like fields
pub const DESCRIPTION_FIELDS: [&str; 4] = ["description", "summary", "caption", "suchtext"];
/// Tag and keyword fields, matched without boost in the recall tier
pub const KEYWORD_FIELDS: [&str; 3] = ["keywords", "tags", "fotografen"];

/// Name of the collection facet aggregation
pub const FACET_AGGREGATION: &str = "by_db";

/// Largest integer the index client can represent exactly
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

const PHRASE_BOTH_BOOST: u32 = 9;
const TITLE_PHRASE_FIELDS: [&str; 3] = ["title^8", "headline^7", "titel^6"];
const DESCRIPTION_PHRASE_FIELDS: [&str; 4] =
    ["suchtext^7", "caption^5", "summary^4", "description^3"];
const ALL_WORDS_FIELDS: [&str; 7] = [
    "title^5",
    "headline^5",
    "titel^4",
    "suchtext^4",
    "caption^3",
    "summary^3",
    "description^2",
];

/// The term as a media id, if it is purely numeric with at least two
/// digits and fits a safe integer
pub fn numeric_media_id(term: &str) -> Option<u64> {
    if term.len() < 2 || !term.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    term.parse::<u64>().ok().filter(|n| *n <= MAX_SAFE_INTEGER)
}

/// Non-scoring filter clauses for collections and an inclusive date range
pub fn filter_clauses(
    collections: &BTreeSet<String>,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
) -> Vec<Value> {
    let mut filter = Vec::new();

    if !collections.is_empty() {
        filter.push(json!({ "terms": { COLLECTION_FIELD: collections } }));
    }

    if date_start.is_some() || date_end.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(start) = date_start {
            range.insert("gte".to_string(), json!(start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = date_end {
            range.insert("lte".to_string(), json!(end.format("%Y-%m-%d").to_string()));
        }
        filter.push(json!({ "range": { DATE_FIELD: range } }));
    }

    filter
}

fn phrase(term: &str, fields: &[&str]) -> Value {
    json!({
        "multi_match": {
            "query": term,
            "type": "phrase",
            "slop": 0,
            "fields": fields,
        }
    })
}

fn relevance_tiers(term: &str) -> Vec<Value> {
    let plain_title: Vec<String> = TITLE_FIELDS.iter().map(|f| format!("{}^1", f)).collect();
    let plain_description: Vec<String> =
        DESCRIPTION_FIELDS.iter().map(|f| format!("{}^1", f)).collect();
    let plain_title: Vec<&str> = plain_title.iter().map(String::as_str).collect();
    let plain_description: Vec<&str> = plain_description.iter().map(String::as_str).collect();

    let mut all_words_fields: Vec<&str> = ALL_WORDS_FIELDS.to_vec();
    all_words_fields.extend_from_slice(&KEYWORD_FIELDS);

    let mut should = vec![
        // Exact phrase in both a title-like and a description-like field
        json!({
            "bool": {
                "must": [phrase(term, &plain_title), phrase(term, &plain_description)],
                "boost": PHRASE_BOTH_BOOST,
            }
        }),
        phrase(term, &TITLE_PHRASE_FIELDS),
        phrase(term, &DESCRIPTION_PHRASE_FIELDS),
        // Every word somewhere, not necessarily adjacent
        json!({
            "multi_match": {
                "query": term,
                "type": "best_fields",
                "operator": "AND",
                "minimum_should_match": "100%",
                "fields": all_words_fields,
            }
        }),
    ];

    if let Some(id) = numeric_media_id(term) {
        should.push(json!({ "term": { MEDIA_ID_FIELD: id } }));
    }

    should
}

fn facet_aggregation() -> Value {
    json!({
        FACET_AGGREGATION: {
            "filters": {
                "filters": {
                    "stock": { "match": { COLLECTION_FIELD: "stock" } },
                    "sport": { "match": { COLLECTION_FIELD: "sport" } },
                    "other": {
                        "bool": {
                            "must": [{ "exists": { "field": COLLECTION_FIELD } }],
                            "must_not": [
                                { "match": { COLLECTION_FIELD: "stock" } },
                                { "match": { COLLECTION_FIELD: "sport" } },
                            ],
                        }
                    },
                    "unknown": {
                        "bool": {
                            "must_not": [{ "exists": { "field": COLLECTION_FIELD } }],
                        }
                    },
                }
            }
        }
    })
}

/// A fully normalized search, ready to be turned into an index request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub collections: BTreeSet<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub from: u64,
    pub size: u32,
}

impl From<&SearchRequest> for SearchQuery {
    fn from(request: &SearchRequest) -> Self {
        Self {
            term: request.term.clone(),
            collections: request.db_filter.clone(),
            date_start: request.date_start,
            date_end: request.date_end,
            from: request.offset(),
            size: request.page_size,
        }
    }
}

impl SearchQuery {
    /// Build the index request body
    pub fn build(&self) -> Value {
        let (should, minimum_should_match) = if self.term.is_empty() {
            (vec![json!({ "match_all": {} })], 0)
        } else {
            (relevance_tiers(&self.term), 1)
        };

        json!({
            "track_total_hits": true,
            "query": {
                "bool": {
                    "should": should,
                    "filter": filter_clauses(&self.collections, self.date_start, self.date_end),
                    "minimum_should_match": minimum_should_match,
                }
            },
            "from": self.from,
            "size": self.size,
            "sort": [
                { "_score": { "order": "desc" } },
                { DATE_FIELD: { "order": "desc", "unmapped_type": "date" } },
            ],
            "_source": true,
            "aggs": facet_aggregation(),
        })
    }
}
