pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::cache::ResponseCache;
use crate::search::SearchService;
use crate::suggest::SuggestService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub suggest: Arc<SuggestService>,
    pub cache: ResponseCache,
}

impl AppState {
    pub fn new(search: SearchService, suggest: SuggestService, cache: ResponseCache) -> Self {
        Self {
            search: Arc::new(search),
            suggest: Arc::new(suggest),
            cache,
        }
    }
}
