//! Suggest orchestration

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{suggest_key, CacheStatus, Cacheable, ResponseCache, Served};
use crate::models::{SuggestRequest, SuggestResponse};
use crate::search::{SearchError, SearchIndex, SearchResult};
use crate::suggest::candidates::collect_candidates;
use crate::suggest::query::build_suggest_body;
use crate::suggest::ranker::rank_suggestions;

/// Answers autocomplete requests. Never fails: an index failure with
/// nothing cached yields an empty list.
#[derive(Clone)]
pub struct SuggestService {
    index: Arc<dyn SearchIndex>,
    cache: ResponseCache,
    index_timeout: Duration,
    cache_ttl: Duration,
}

impl SuggestService {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        cache: ResponseCache,
        index_timeout: Duration,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            index,
            cache,
            index_timeout,
            cache_ttl,
        }
    }

    pub async fn suggest(&self, request: &SuggestRequest) -> Served<SuggestResponse> {
        if !request.is_searchable() {
            return Served::skip(SuggestResponse::empty());
        }

        let key = suggest_key(request);

        if !request.bypass_cache {
            if let Some(mut cached) = self.cache.read_fresh::<SuggestResponse>(&key).await {
                cached.mark_cached();
                tracing::info!(key = %key, prefix = %request.prefix, "suggest_cache_hit");
                return Served::hit(cached);
            }
        }

        match self.fetch(request).await {
            Ok((response, index_ms)) => {
                tracing::info!(
                    key = %key,
                    prefix = %request.prefix,
                    count = response.suggestions.len(),
                    index_ms = index_ms,
                    "suggest_ok"
                );
                if !request.bypass_cache {
                    self.cache
                        .write_detached(key, response.clone(), self.cache_ttl)
                        .await;
                }
                Served::miss(response, index_ms)
            }
            Err(e) => {
                if let Some(stale) = self
                    .cache
                    .serve_stale_on_error::<SuggestResponse>(&key, &e)
                    .await
                {
                    tracing::warn!(key = %key, prefix = %request.prefix, error = %e, "suggest_stale_serve");
                    return Served::stale(stale, e);
                }
                tracing::warn!(key = %key, prefix = %request.prefix, error = %e, "suggest_error");
                Served {
                    body: SuggestResponse::empty(),
                    cache: CacheStatus::Miss,
                    index_ms: None,
                }
            }
        }
    }

    async fn fetch(&self, request: &SuggestRequest) -> SearchResult<(SuggestResponse, u64)> {
        let body = build_suggest_body(request);

        let started = Instant::now();
        let raw = tokio::time::timeout(self.index_timeout, self.index.search(&body))
            .await
            .map_err(|_| SearchError::IndexTimeout(self.index_timeout.as_millis() as u64))??;
        let index_ms = started.elapsed().as_millis() as u64;

        let prefix = request.prefix_lower();
        let candidates = raw
            .hits
            .hits
            .iter()
            .filter_map(|hit| hit.source.as_ref())
            .flat_map(|source| collect_candidates(source, &prefix));

        Ok((SuggestResponse::new(rank_suggestions(candidates)), index_ms))
    }
}
