use crate::api::AppState;
use crate::cache::{CacheStatus, Served};
use crate::error::Result;
use crate::models::{parse_date, SearchRequest, SuggestRequest, DEFAULT_PAGE_SIZE};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Query string of `/api/search`. Everything is taken as text so that
/// junk values fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    pub db: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub cache: Option<String>,
}

/// Query string of `/api/suggest`
#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    pub q: Option<String>,
    pub db: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub cache: Option<String>,
}

fn parse_int(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

fn wants_bypass(raw: Option<&str>) -> bool {
    raw.map(|v| v.trim() == "0").unwrap_or(false)
}

impl SearchParams {
    pub fn into_request(self) -> SearchRequest {
        SearchRequest::new(self.q.as_deref().unwrap_or(""))
            .with_page(parse_int(self.page.as_deref(), 1))
            .with_page_size(parse_int(self.size.as_deref(), DEFAULT_PAGE_SIZE as i64))
            .with_db_filter(self.db.as_deref().unwrap_or(""))
            .with_date_range(parse_date(self.start.as_deref()), parse_date(self.end.as_deref()))
            .with_bypass_cache(wants_bypass(self.cache.as_deref()))
    }
}

impl SuggestParams {
    pub fn into_request(self) -> SuggestRequest {
        SuggestRequest::new(self.q.as_deref().unwrap_or(""))
            .with_db_filter(self.db.as_deref().unwrap_or(""))
            .with_date_range(parse_date(self.start.as_deref()), parse_date(self.end.as_deref()))
            .with_bypass_cache(wants_bypass(self.cache.as_deref()))
    }
}

/// `x-cache`, `server-timing` and `x-error` for a served response
pub fn cache_headers<T>(served: &Served<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(
        "x-cache",
        HeaderValue::from_static(served.cache.header_value()),
    );

    let timing = match (&served.cache, served.index_ms) {
        (CacheStatus::Hit, _) => Some("cache;desc=hit".to_string()),
        (CacheStatus::Stale { .. }, _) => Some("cache;desc=stale".to_string()),
        (_, Some(ms)) => Some(format!("es;dur={}", ms)),
        _ => None,
    };
    if let Some(value) = timing.and_then(|t| HeaderValue::from_str(&t).ok()) {
        headers.insert("server-timing", value);
    }

    if let CacheStatus::Stale { error } = &served.cache {
        // Header values must be visible ASCII
        let printable: String = error
            .chars()
            .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
            .collect();
        if let Ok(value) = HeaderValue::from_str(&printable) {
            headers.insert("x-error", value);
        }
    }

    headers
}

/// Free-text media search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let request = params.into_request();
    let served = state.search.search(&request).await?;
    let headers = cache_headers(&served);
    Ok((headers, Json(served.body)).into_response())
}

/// Autocomplete suggestions; never an error
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Response {
    let request = params.into_request();
    let served = state.suggest.suggest(&request).await;
    let headers = cache_headers(&served);
    (headers, Json(served.body)).into_response()
}

const UP: &str = "UP";
const DOWN: &str = "DOWN";
const DISABLED: &str = "DISABLED";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub redis: String,
    pub elasticsearch: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub checks: HealthChecks,
}

/// Health check endpoint. A disabled cache does not count as down.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let (cache, index) = tokio::join!(state.cache.ping(), state.search.ping_index());

    let redis = match cache {
        None => DISABLED,
        Some(true) => UP,
        Some(false) => DOWN,
    };
    let elasticsearch = if index { UP } else { DOWN };
    let healthy = redis != DOWN && elasticsearch == UP;

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: if healthy { UP } else { DOWN }.to_string(),
        checks: HealthChecks {
            redis: redis.to_string(),
            elasticsearch: elasticsearch.to_string(),
        },
    };

    (status, [(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
}
