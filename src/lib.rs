//! Media search and autocomplete over an Elasticsearch index, with a
//! cache-aside response cache that can serve stale entries while the index
//! is down.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod suggest;

pub use error::{AppError, Result};
