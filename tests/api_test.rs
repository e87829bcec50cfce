//! HTTP surface tests driving the router directly

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use common::*;
use media_search::cache::ResponseCache;
use media_search::search::SearchError;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

fn sample_index() -> Arc<FakeIndex> {
    FakeIndex::new(index_response(vec![
        json!({ "title": "Red car", "db": "stock", "bildnummer": 42, "fotografen": "Jane" }),
        json!({ "title": "Red bike", "db": "sport", "bildnummer": 43 }),
    ]))
}

#[tokio::test]
async fn test_search_wire_format() {
    let app = router(sample_index(), memory_cache());

    let response = get(app, "/api/search?q=red&size=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cache"), Some("MISS"));
    assert_eq!(header(&response, "cache-control"), Some("no-store"));
    assert!(header(&response, "server-timing").unwrap().starts_with("es;dur="));

    let body = json_body(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["size"], 10);
    assert_eq!(body["total"], 2);
    assert_eq!(body["byDb"], json!({ "st": 1, "sp": 1 }));
    assert_eq!(body["_cached"], false);
    assert_eq!(body["_stale"], false);

    let first = &body["results"][0];
    assert_eq!(first["title"], "Red car");
    assert_eq!(first["db"], "st");
    assert_eq!(first["paddedMediaId"], "0000000042");
    assert_eq!(first["thumbnailUrl"], format!("{}/bild/st/0000000042/s.jpg", BASE_URL));
    assert_eq!(first["raw"]["fotografen"], "Jane");
}

#[tokio::test]
async fn test_repeat_search_hits_cache() {
    let index = sample_index();
    let cache = memory_cache();

    get(router(index.clone(), cache.clone()), "/api/search?q=red").await;
    let response = get(router(index.clone(), cache), "/api/search?q=red").await;

    assert_eq!(header(&response, "x-cache"), Some("HIT"));
    assert_eq!(header(&response, "server-timing"), Some("cache;desc=hit"));
    assert_eq!(json_body(response).await["_cached"], true);
    assert_eq!(index.call_count(), 1);
}

#[tokio::test]
async fn test_junk_parameters_fall_back_to_defaults() {
    let index = sample_index();
    let app = router(index.clone(), ResponseCache::disabled());

    let response = get(app, "/api/search?q=red&page=abc&size=&start=notadate&cache=0").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["size"], 40);

    let sent = index.last_body().unwrap();
    assert!(sent["query"]["bool"]["filter"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_search_headers() {
    let index = sample_index();
    let cache = memory_cache();

    get(router(index.clone(), cache.clone()), "/api/search?q=red").await;
    index.fail_with(SearchError::IndexTimeout(4000));

    let response = get(router(index, cache), "/api/search?q=red&cache=0").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cache"), Some("STALE"));
    assert_eq!(header(&response, "server-timing"), Some("cache;desc=stale"));
    assert!(header(&response, "x-error").unwrap().contains("4000"));

    let body = json_body(response).await;
    assert_eq!(body["_stale"], true);
    assert_eq!(body["_cached"], true);
}

#[tokio::test]
async fn test_failed_search_returns_error_payload() {
    let index = sample_index();
    index.fail_with(SearchError::IndexTimeout(4000));
    let app = router(index, memory_cache());

    let response = get(app, "/api/search?q=red").await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INDEX_TIMEOUT");
    assert_eq!(body["error"]["status"], 504);
    assert_eq!(body["error"]["retryable"], true);
}

#[tokio::test]
async fn test_unreachable_index_maps_to_service_unavailable() {
    let index = sample_index();
    index.fail_with(SearchError::IndexUnavailable("connection refused".to_string()));

    let response = get(router(index, ResponseCache::disabled()), "/api/search?q=red").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_suggest_endpoint() {
    let index = sample_index();
    let app = router(index.clone(), memory_cache());

    let response = get(app.clone(), "/api/suggest?q=re").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cache"), Some("MISS"));
    let body = json_body(response).await;
    assert_eq!(body["suggestions"][0], "Red");
    assert_eq!(body["_cached"], false);

    let response = get(app, "/api/suggest?q=r").await;
    assert_eq!(header(&response, "x-cache"), Some("SKIP"));
    assert_eq!(json_body(response).await["suggestions"], json!([]));
    assert_eq!(index.call_count(), 1);
}

#[tokio::test]
async fn test_failed_suggest_is_empty_not_error() {
    let index = sample_index();
    index.fail_with(SearchError::IndexUnavailable("connection refused".to_string()));

    let response = get(router(index, ResponseCache::disabled()), "/api/suggest?q=red").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["suggestions"], json!([]));
}

#[tokio::test]
async fn test_health() {
    let index = sample_index();

    let response = get(router(index.clone(), memory_cache()), "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({ "status": "UP", "checks": { "redis": "UP", "elasticsearch": "UP" } }));

    let response = get(
        router(index.clone(), ResponseCache::new(Some(Arc::new(DownCacheStore)))),
        "/api/health",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["checks"]["redis"], "DOWN");

    index.fail_with(SearchError::IndexUnavailable("connection refused".to_string()));
    let response = get(router(index, ResponseCache::disabled()), "/api/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "DOWN");
    assert_eq!(body["checks"]["redis"], "DISABLED");
    assert_eq!(body["checks"]["elasticsearch"], "DOWN");
}
