//! Media search against an Elasticsearch index.
//!
//! ```text
//! SearchRequest ──► cache lookup ──hit──► response (_cached)
//!                       │ miss / bypass
//!                       ▼
//!                  SearchQuery::build ──► SearchIndex ──► DocumentNormalizer
//!                       │ failure                              │
//!                       ▼                                      ▼
//!                  stale entry? ──► response (_stale)     cache write
//! ```

mod document;
mod error;
mod index;
mod query;
mod service;

pub use document::{pad_media_id, thumbnail_url, DocumentNormalizer, PADDED_MEDIA_ID_LEN};
pub use error::{SearchError, SearchResult};
pub use index::{
    Bucket, ElasticsearchIndex, FiltersAggregation, IndexHits, IndexResponse, RawHit, SearchIndex,
    TotalHits,
};
pub use query::{
    filter_clauses, numeric_media_id, SearchQuery, COLLECTION_FIELD, DATE_FIELD,
    DESCRIPTION_FIELDS, FACET_AGGREGATION, KEYWORD_FIELDS, MAX_SAFE_INTEGER, MEDIA_ID_FIELD,
    TITLE_FIELDS,
};
pub use service::SearchService;
