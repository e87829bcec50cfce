//! Response caching: store backends, key derivation, and the cache-aside
//! helper used by the search and suggest services.

pub mod factory;
pub mod key;
pub mod memory;
pub mod redis_store;
pub mod response_cache;
pub mod store;

pub use factory::{create_cache_store, create_response_cache};
pub use key::{search_key, suggest_key};
pub use memory::MemoryCacheStore;
pub use redis_store::RedisCacheStore;
pub use response_cache::{CacheStatus, Cacheable, ResponseCache, Served};
pub use store::{CacheError, CacheResult, CacheStore};
