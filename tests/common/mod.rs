//! Shared fakes for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use media_search::api::{build_router, AppState};
use media_search::cache::{CacheError, CacheResult, CacheStore, MemoryCacheStore, ResponseCache};
use media_search::search::{
    DocumentNormalizer, IndexResponse, SearchError, SearchIndex, SearchResult, SearchService,
};
use media_search::suggest::SuggestService;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "https://media.example.com";

/// An index that answers every request with a fixed response, or fails
/// on demand
pub struct FakeIndex {
    response: Mutex<Value>,
    failure: Mutex<Option<SearchError>>,
    healthy: AtomicBool,
    pub calls: AtomicUsize,
    pub bodies: Mutex<Vec<Value>>,
}

impl FakeIndex {
    pub fn new(response: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            failure: Mutex::new(None),
            healthy: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            bodies: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_with(&self, error: SearchError) {
        *self.failure.lock() = Some(error);
        self.healthy.store(false, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
        self.healthy.store(true, Ordering::SeqCst);
    }

    pub fn set_response(&self, response: Value) {
        *self.response.lock() = response;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().last().cloned()
    }
}

fn clone_error(error: &SearchError) -> SearchError {
    match error {
        SearchError::IndexTimeout(ms) => SearchError::IndexTimeout(*ms),
        SearchError::IndexUnavailable(msg) => SearchError::IndexUnavailable(msg.clone()),
        SearchError::IndexStatus { status, body } => SearchError::IndexStatus {
            status: *status,
            body: body.clone(),
        },
        SearchError::BadResponse(msg) => SearchError::BadResponse(msg.clone()),
    }
}

#[async_trait]
impl SearchIndex for FakeIndex {
    async fn search(&self, body: &Value) -> SearchResult<IndexResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().push(body.clone());
        if let Some(error) = self.failure.lock().as_ref() {
            return Err(clone_error(error));
        }
        let response = self.response.lock().clone();
        Ok(serde_json::from_value(response)?)
    }

    async fn ping(&self) -> SearchResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SearchError::IndexUnavailable("connection refused".to_string()))
        }
    }
}

/// A cache store that is always unreachable
pub struct DownCacheStore;

#[async_trait]
impl CacheStore for DownCacheStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn ping(&self) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }
}

/// Raw index response with the given `_source` documents. Facet buckets
/// are counted from each document's `db` field.
pub fn index_response(sources: Vec<Value>) -> Value {
    let mut stock = 0;
    let mut sport = 0;
    let mut other = 0;
    let mut unknown = 0;
    for source in &sources {
        match source.get("db").and_then(Value::as_str) {
            Some("stock") => stock += 1,
            Some("sport") => sport += 1,
            Some(_) => other += 1,
            None => unknown += 1,
        }
    }

    let hits: Vec<Value> = sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| json!({ "_id": format!("doc-{}", i), "_score": 1.0, "_source": source }))
        .collect();

    json!({
        "hits": { "total": { "value": hits.len(), "relation": "eq" }, "hits": hits },
        "aggregations": {
            "by_db": {
                "buckets": {
                    "stock": { "doc_count": stock },
                    "sport": { "doc_count": sport },
                    "other": { "doc_count": other },
                    "unknown": { "doc_count": unknown }
                }
            }
        }
    })
}

pub fn memory_cache() -> ResponseCache {
    ResponseCache::new(Some(Arc::new(MemoryCacheStore::default())))
}

pub fn search_service(index: Arc<FakeIndex>, cache: ResponseCache) -> SearchService {
    SearchService::new(
        index,
        cache,
        DocumentNormalizer::new(BASE_URL),
        Duration::from_millis(500),
        Duration::from_secs(3600),
    )
}

pub fn suggest_service(index: Arc<FakeIndex>, cache: ResponseCache) -> SuggestService {
    SuggestService::new(
        index,
        cache,
        Duration::from_millis(500),
        Duration::from_secs(600),
    )
}

pub fn router(index: Arc<FakeIndex>, cache: ResponseCache) -> axum::Router {
    let state = AppState::new(
        search_service(index.clone(), cache.clone()),
        suggest_service(index, cache.clone()),
        cache,
    );
    build_router(state)
}
