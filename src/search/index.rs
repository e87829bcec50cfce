//! Search index collaborator: the trait the services call and the
//! Elasticsearch HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::config::IndexConfig;
use crate::search::error::{SearchError, SearchResult};
use crate::search::query::FACET_AGGREGATION;

/// Hit count, as an object (`{"value": n}`) or a bare number on older clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Object { value } => *value,
            TotalHits::Count(value) => *value,
        }
    }
}

/// One raw hit as returned by the index
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(rename = "_source", default)]
    pub source: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexHits {
    #[serde(default)]
    pub total: Option<TotalHits>,

    #[serde(default)]
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub doc_count: u64,
}

/// A `filters` aggregation result: named bucket counts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltersAggregation {
    #[serde(default)]
    pub buckets: HashMap<String, Bucket>,
}

/// Raw index search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexResponse {
    #[serde(default)]
    pub hits: IndexHits,

    #[serde(default)]
    pub aggregations: HashMap<String, FiltersAggregation>,
}

impl IndexResponse {
    /// Count in a bucket of the collection facet aggregation, zero if absent
    pub fn facet_bucket(&self, name: &str) -> u64 {
        self.aggregations
            .get(FACET_AGGREGATION)
            .and_then(|agg| agg.buckets.get(name))
            .map(|bucket| bucket.doc_count)
            .unwrap_or(0)
    }

    /// Total hit count, falling back to the page length
    pub fn total(&self) -> u64 {
        self.hits
            .total
            .map(|t| t.value())
            .unwrap_or(self.hits.hits.len() as u64)
    }
}

/// A full-text index that accepts structured query bodies
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Run a search request body and return the raw response
    async fn search(&self, body: &Value) -> SearchResult<IndexResponse>;

    /// Check the index is reachable
    async fn ping(&self) -> SearchResult<()>;
}

/// Elasticsearch over HTTP
pub struct ElasticsearchIndex {
    client: Client,
    base_url: String,
    index: String,
    username: Option<String>,
    password: Option<String>,
    timeout_ms: u64,
}

impl ElasticsearchIndex {
    pub fn new(config: &IndexConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| SearchError::IndexUnavailable(format!("Failed to create HTTP client: {}", e)))?;

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate validation disabled for the search index");
        }

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn request_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::IndexTimeout(self.timeout_ms)
        } else {
            SearchError::from(err)
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_ref()),
            None => request,
        }
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn search(&self, body: &Value) -> SearchResult<IndexResponse> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        let response = self
            .authorize(self.client.post(&url).json(body))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            let mut body = text;
            body.truncate(512);
            return Err(SearchError::IndexStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn ping(&self) -> SearchResult<()> {
        let response = self
            .authorize(self.client.get(&self.base_url))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SearchError::IndexStatus {
                status: status.as_u16(),
                body: String::new(),
            })
        }
    }
}
