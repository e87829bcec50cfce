use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheError, CacheStore};

/// A payload the response cache can store and re-emit
pub trait Cacheable: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Flag the payload as coming from the cache
    fn mark_cached(&mut self);

    /// Flag the payload as a stale fallback after a source failure
    fn mark_stale(&mut self);
}

/// How a response was produced, as reported in `x-cache`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from a fresh cache entry
    Hit,
    /// Computed from the index
    Miss,
    /// Index failed; served a previously cached entry
    Stale { error: String },
    /// Request short-circuited without touching cache or index
    Skip,
}

impl CacheStatus {
    pub fn header_value(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Stale { .. } => "STALE",
            CacheStatus::Skip => "SKIP",
        }
    }
}

/// A response body with how it was produced
#[derive(Debug, Clone)]
pub struct Served<T> {
    pub body: T,
    pub cache: CacheStatus,
    /// Index round-trip time when the index was called successfully
    pub index_ms: Option<u64>,
}

impl<T> Served<T> {
    pub fn hit(body: T) -> Self {
        Self {
            body,
            cache: CacheStatus::Hit,
            index_ms: None,
        }
    }

    pub fn miss(body: T, index_ms: u64) -> Self {
        Self {
            body,
            cache: CacheStatus::Miss,
            index_ms: Some(index_ms),
        }
    }

    pub fn stale(body: T, error: impl fmt::Display) -> Self {
        Self {
            body,
            cache: CacheStatus::Stale {
                error: error.to_string(),
            },
            index_ms: None,
        }
    }

    pub fn skip(body: T) -> Self {
        Self {
            body,
            cache: CacheStatus::Skip,
            index_ms: None,
        }
    }
}

/// Cache-aside helper wrapping an optional cache store.
///
/// Every failure inside is logged and degraded to "absent"; callers never
/// see a cache error. Without a store every read misses and every write
/// is a no-op.
#[derive(Clone, Default)]
pub struct ResponseCache {
    store: Option<Arc<dyn CacheStore>>,
}

impl ResponseCache {
    pub fn new(store: Option<Arc<dyn CacheStore>>) -> Self {
        Self { store }
    }

    /// A cache that never holds anything
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    async fn read<T: Cacheable>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        match store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read and parse the entry under `key`. Unavailable stores and
    /// unparseable entries read as absent.
    pub async fn read_fresh<T: Cacheable>(&self, key: &str) -> Option<T> {
        match self.read(key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = key, error = %e, "cache_read_error");
                None
            }
        }
    }

    /// Best-effort write; failures are logged and swallowed
    pub async fn write<T: Cacheable>(&self, key: &str, entry: &T, ttl: Duration) {
        let Some(store) = &self.store else {
            return;
        };

        let raw = match serde_json::to_string(entry) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = key, error = %e, "cache_write_error");
                return;
            }
        };

        if let Err(e) = store.set(key, raw, ttl).await {
            tracing::warn!(key = key, error = %e, "cache_write_error");
        }
    }

    /// Write on a detached task and wait for it. If the caller is dropped
    /// mid-write the task still runs to completion.
    pub async fn write_detached<T: Cacheable>(&self, key: String, entry: T, ttl: Duration) {
        if !self.is_enabled() {
            return;
        }

        let cache = self.clone();
        let handle = tokio::spawn(async move {
            cache.write(&key, &entry, ttl).await;
        });

        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "cache_write_task_failed");
        }
    }

    /// Fallback after the primary fetch failed: return whatever entry is
    /// stored under `key`, flagged stale. Absent when the store is
    /// unreachable or empty for `key`.
    pub async fn serve_stale_on_error<T: Cacheable>(
        &self,
        key: &str,
        original_error: &(dyn fmt::Display + Sync),
    ) -> Option<T> {
        match self.read::<T>(key).await {
            Ok(Some(mut entry)) => {
                entry.mark_stale();
                tracing::debug!(key = key, error = %original_error, "Found stale entry after source failure");
                Some(entry)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(key = key, error = %e, "stale lookup failed");
                None
            }
        }
    }

    /// Reachability of the underlying store; `None` when caching is disabled
    pub async fn ping(&self) -> Option<bool> {
        let store = self.store.as_ref()?;
        Some(store.ping().await.is_ok())
    }
}
