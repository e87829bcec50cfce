use std::sync::Arc;

use crate::cache::{CacheStore, RedisCacheStore, ResponseCache};
use crate::config::CacheConfig;

/// Create the cache store described by configuration.
///
/// Returns `None` when no Redis URL is configured or the URL is invalid;
/// the service then runs uncached.
pub fn create_cache_store(config: &CacheConfig) -> Option<Arc<dyn CacheStore>> {
    let Some(redis_url) = config.redis_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        tracing::warn!("No Redis URL configured; caching disabled");
        return None;
    };

    match RedisCacheStore::new(redis_url, config.connect_timeout(), config.command_timeout()) {
        Ok(store) => {
            tracing::info!(
                connect_timeout_ms = config.connect_timeout_ms,
                "Redis cache configured (connects on first use)"
            );
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid Redis configuration; caching disabled");
            None
        }
    }
}

/// Create the response cache described by configuration
pub fn create_response_cache(config: &CacheConfig) -> ResponseCache {
    ResponseCache::new(create_cache_store(config))
}
