//! Search orchestration: cache-aside around the index with stale fallback

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{search_key, Cacheable, ResponseCache, Served};
use crate::models::{FacetCounts, SearchRequest, SearchResponse};
use crate::search::document::DocumentNormalizer;
use crate::search::error::{SearchError, SearchResult};
use crate::search::index::SearchIndex;
use crate::search::query::SearchQuery;

/// Answers search requests from the cache or the index
#[derive(Clone)]
pub struct SearchService {
    index: Arc<dyn SearchIndex>,
    cache: ResponseCache,
    normalizer: DocumentNormalizer,
    index_timeout: Duration,
    cache_ttl: Duration,
}

impl SearchService {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        cache: ResponseCache,
        normalizer: DocumentNormalizer,
        index_timeout: Duration,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            index,
            cache,
            normalizer,
            index_timeout,
            cache_ttl,
        }
    }

    /// Serve one page of results.
    ///
    /// A fresh cache entry wins unless the request bypasses the cache. On a
    /// miss the index is queried and the result written back. When the
    /// index fails, the last cached entry for the same key is served marked
    /// stale, bypass or not; with nothing cached the index error is returned.
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<Served<SearchResponse>> {
        let key = search_key(request);

        if !request.bypass_cache {
            if let Some(mut cached) = self.cache.read_fresh::<SearchResponse>(&key).await {
                cached.mark_cached();
                tracing::info!(key = %key, term = %request.term, page = request.page, "search_cache_hit");
                return Ok(Served::hit(cached));
            }
        }

        match self.fetch(request).await {
            Ok((response, index_ms)) => {
                tracing::info!(
                    key = %key,
                    term = %request.term,
                    page = request.page,
                    total = response.total,
                    index_ms = index_ms,
                    "search_ok"
                );
                if !request.bypass_cache {
                    self.cache
                        .write_detached(key, response.clone(), self.cache_ttl)
                        .await;
                }
                Ok(Served::miss(response, index_ms))
            }
            Err(e) => {
                if let Some(stale) = self
                    .cache
                    .serve_stale_on_error::<SearchResponse>(&key, &e)
                    .await
                {
                    tracing::warn!(key = %key, term = %request.term, error = %e, "search_stale_serve");
                    return Ok(Served::stale(stale, e));
                }
                tracing::error!(key = %key, term = %request.term, error = %e, "search_error");
                Err(e)
            }
        }
    }

    async fn fetch(&self, request: &SearchRequest) -> SearchResult<(SearchResponse, u64)> {
        let body = SearchQuery::from(request).build();

        let started = Instant::now();
        let raw = tokio::time::timeout(self.index_timeout, self.index.search(&body))
            .await
            .map_err(|_| SearchError::IndexTimeout(self.index_timeout.as_millis() as u64))??;
        let index_ms = started.elapsed().as_millis() as u64;

        let documents = raw
            .hits
            .hits
            .iter()
            .map(|hit| self.normalizer.normalize(hit))
            .collect();

        let response = SearchResponse {
            page: request.page,
            page_size: request.page_size,
            total: raw.total(),
            facet_counts: FacetCounts::new(
                raw.facet_bucket("stock"),
                raw.facet_bucket("sport"),
                raw.facet_bucket("other"),
                raw.facet_bucket("unknown"),
            ),
            documents,
            served_from_cache: false,
            is_stale: false,
        };

        Ok((response, index_ms))
    }

    /// Reachability of the index
    pub async fn ping_index(&self) -> bool {
        matches!(
            tokio::time::timeout(self.index_timeout, self.index.ping()).await,
            Ok(Ok(()))
        )
    }
}
