use async_trait::async_trait;
use std::time::Duration;

/// Result type for cache store operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors raised by a cache store. They never leave the cache layer.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Could not establish a connection to the store
    #[error("Cache connection failed: {0}")]
    Connection(String),

    /// The store rejected or failed a command
    #[error("Cache command failed: {0}")]
    Command(String),

    /// The store did not answer in time
    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    /// Entry could not be encoded or decoded
    #[error("Cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key to string store with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the value stored under `key`, if any
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Check the store is reachable
    async fn ping(&self) -> CacheResult<()>;
}
