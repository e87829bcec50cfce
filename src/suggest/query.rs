use serde_json::{json, Value};

use crate::models::SuggestRequest;
use crate::search::filter_clauses;
use crate::suggest::candidates::MINED_FIELDS;

/// Documents fetched to mine candidates from
pub const SUGGEST_SAMPLE_SIZE: u32 = 200;

/// Per-shard document cap for the suggest query
pub const SUGGEST_TERMINATE_AFTER: u32 = 400;

const PREFIX_FIELDS: [&str; 7] = [
    "title^6",
    "headline^5",
    "titel^5",
    "suchtext^4",
    "caption^3",
    "summary^2",
    "description^2",
];

/// Index request body fetching the documents candidates are mined from
pub fn build_suggest_body(request: &SuggestRequest) -> Value {
    json!({
        "size": SUGGEST_SAMPLE_SIZE,
        "terminate_after": SUGGEST_TERMINATE_AFTER,
        "track_total_hits": false,
        "_source": MINED_FIELDS,
        "query": {
            "bool": {
                "must": [{
                    "multi_match": {
                        "query": request.prefix,
                        "type": "phrase_prefix",
                        "fields": PREFIX_FIELDS,
                    }
                }],
                "filter": filter_clauses(&request.db_filter, request.date_start, request.date_end),
            }
        }
    })
}
