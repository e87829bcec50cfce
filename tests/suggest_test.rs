//! Autocomplete tests against an in-memory index and cache

mod common;

use common::*;
use media_search::cache::{CacheStatus, ResponseCache};
use media_search::models::SuggestRequest;
use media_search::search::SearchError;
use media_search::suggest::{rank_suggestions, MAX_SUGGESTIONS};
use serde_json::json;

fn titles(titles: &[&str]) -> serde_json::Value {
    index_response(titles.iter().map(|t| json!({ "title": t })).collect())
}

#[tokio::test]
async fn test_one_char_prefix_returns_nothing_without_index_call() {
    let index = FakeIndex::new(titles(&["Apple tree"]));
    let service = suggest_service(index.clone(), memory_cache());

    for prefix in ["a", " a ", "", "   "] {
        let served = service.suggest(&SuggestRequest::new(prefix)).await;
        assert_eq!(served.cache, CacheStatus::Skip);
        assert!(served.body.suggestions.is_empty());
    }
    assert_eq!(index.call_count(), 0);
}

#[tokio::test]
async fn test_phrases_are_mined_across_fields_and_documents() {
    let index = FakeIndex::new(index_response(vec![
        json!({ "title": "Berlin Marathon 2019", "caption": "Runners at the Berlin Marathon" }),
        json!({ "headline": "Berlin Wall anniversary", "description": "Crowds in Berlin" }),
        json!({ "suchtext": "berlin marathon finish" }),
    ]));
    let service = suggest_service(index, ResponseCache::disabled());

    let served = service.suggest(&SuggestRequest::new("ber")).await;
    let suggestions = served.body.suggestions;

    assert_eq!(suggestions[0], "Berlin");
    assert_eq!(suggestions[1], "Berlin Marathon");
    assert!(suggestions.contains(&"Berlin Wall".to_string()));
    assert!(suggestions.contains(&"In Berlin".to_string()));
    assert!(suggestions.len() <= MAX_SUGGESTIONS);
}

#[tokio::test]
async fn test_two_word_prefix_only_yields_matching_pairs() {
    let index = FakeIndex::new(titles(&[
        "Berlin Marathon 2019",
        "The Berlin Mauer",
        "Berlin Wall",
    ]));
    let service = suggest_service(index, ResponseCache::disabled());

    let served = service.suggest(&SuggestRequest::new("berlin ma")).await;
    assert_eq!(served.body.suggestions, vec!["Berlin Mauer", "Berlin Marathon"]);
}

#[tokio::test]
async fn test_sport_captions_keep_scores_and_dotted_names() {
    let index = FakeIndex::new(index_response(vec![
        json!({ "caption": "Bayern 2:1 Dortmund" }),
        json!({ "title": "Bayern 2:1 Dortmund", "headline": "St.Pauli fans celebrate" }),
    ]));
    let service = suggest_service(index, ResponseCache::disabled());

    let served = service.suggest(&SuggestRequest::new("ba")).await;
    assert_eq!(served.body.suggestions, vec!["Bayern", "Bayern 2:1"]);
    assert!(!served.body.suggestions.contains(&"Bayern Dortmund".to_string()));

    // "St.Pauli fans" splits into three words and is dropped by the ranker
    let served = service.suggest(&SuggestRequest::new("st")).await;
    assert_eq!(served.body.suggestions, vec!["St.Pauli"]);
}

#[tokio::test]
async fn test_suggest_query_uses_filters() {
    let index = FakeIndex::new(titles(&[]));
    let service = suggest_service(index.clone(), ResponseCache::disabled());

    service
        .suggest(&SuggestRequest::new("ber").with_db_filter("sp"))
        .await;
    let body = index.last_body().unwrap();

    assert_eq!(body["size"], 200);
    assert_eq!(
        body["query"]["bool"]["filter"][0],
        json!({ "terms": { "db": ["sport"] } })
    );
}

#[tokio::test]
async fn test_failure_without_cache_returns_empty_list() {
    let index = FakeIndex::new(titles(&["Berlin"]));
    index.fail_with(SearchError::IndexUnavailable("connection refused".to_string()));
    let service = suggest_service(index, memory_cache());

    let served = service.suggest(&SuggestRequest::new("ber")).await;
    assert_eq!(served.cache, CacheStatus::Miss);
    assert!(served.body.suggestions.is_empty());
    assert!(!served.body.is_stale);
}

#[tokio::test]
async fn test_failure_serves_stale_suggestions() {
    let index = FakeIndex::new(titles(&["Berlin Marathon"]));
    let service = suggest_service(index.clone(), memory_cache());

    let fresh = service.suggest(&SuggestRequest::new("Ber")).await;
    index.fail_with(SearchError::IndexTimeout(4000));

    let served = service.suggest(&SuggestRequest::new("ber")).await;
    // Still a fresh hit: the cache is consulted first
    assert_eq!(served.cache, CacheStatus::Hit);

    let served = service
        .suggest(&SuggestRequest::new("ber").with_bypass_cache(true))
        .await;
    assert!(matches!(served.cache, CacheStatus::Stale { .. }));
    assert!(served.body.is_stale);
    assert_eq!(served.body.suggestions, fresh.body.suggestions);
}

#[test]
fn test_rank_example_from_counts() {
    let mut candidates = Vec::new();
    candidates.extend(std::iter::repeat("red car").take(3));
    candidates.extend(std::iter::repeat("red").take(5));
    candidates.extend(std::iter::repeat("car").take(5));

    assert_eq!(rank_suggestions(candidates), vec!["Car", "Red", "Red Car"]);
}
