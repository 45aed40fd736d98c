//! Wire-level tests against a mock search service.

use std::time::Duration;

use rankview_client::HttpSearchService;
use rankview_core::error::ServiceError;
use rankview_core::traits::SearchService;
use rankview_core::types::SearchStage;
use rankview_core::wire::{SearchOptions, SearchRequest};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> HttpSearchService {
    HttpSearchService::new(server.uri(), Duration::from_secs(5)).expect("client")
}

#[tokio::test]
async fn start_search_posts_contract_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(json!({
            "query": "trail shoes",
            "customer": "eco-shopper",
            "vectorSearchEnabled": true,
            "rerankerEnabled": false,
            "reasoningEnabled": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("job-42")))
        .expect(1)
        .mount(&server)
        .await;

    let options = SearchOptions { reranker_enabled: false, ..SearchOptions::default() };
    let id = service(&server).start_search(&SearchRequest::new("trail shoes", "eco-shopper", &options)).await.expect("start");
    assert_eq!(id, "job-42");
}

#[tokio::test]
async fn progress_and_results_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/job-1/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search_id": "job-1", "stage": "reranking", "message": "Reranking results", "percentage": 70
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/search/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search_id": "job-1",
            "progress": "complete",
            "standardResults": [{ "id": "a", "title": "A", "price": 10.5 }],
            "aiResults": [{ "id": "a", "title": "A", "price": 10.5, "aiRank": 1, "rankChange": 0 }],
            "summary": { "totalProductCount": 1, "improvedRankCount": 0, "newProductCount": 0, "removedProductCount": 0, "averageRankImprovement": 0.0 }
        })))
        .mount(&server)
        .await;

    let svc = service(&server);
    let progress = svc.progress("job-1").await.expect("progress");
    assert_eq!(progress.stage, SearchStage::Reranking);
    assert_eq!(progress.percentage, 70);

    let results = svc.results("job-1").await.expect("results");
    assert_eq!(results.progress, SearchStage::Complete);
    assert_eq!(results.standard_results.len(), 1);
    assert_eq!(results.ai_results[0].ai_rank, Some(1));
    assert!(results.summary.is_some());
}

#[tokio::test]
async fn error_status_is_reported_with_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/missing/progress"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Search not found" })))
        .mount(&server)
        .await;

    let err = service(&server).progress("missing").await.expect_err("404");
    match err {
        ServiceError::Status { code, endpoint, .. } => {
            assert_eq!(code, 404);
            assert_eq!(endpoint, "/api/search/missing/progress");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/job-1/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stage": "warp_speed" })))
        .mount(&server)
        .await;

    let err = service(&server).progress("job-1").await.expect_err("decode");
    assert!(matches!(err, ServiceError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn personas_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/personas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "budget", "name": "Sam", "type": "Budget Shopper", "avatar": "/sam.png",
            "preferences": { "priceWeight": 0.9, "qualityWeight": 0.4, "brandWeight": 0.2, "description": "Looks for deals" }
        }])))
        .mount(&server)
        .await;

    let personas = service(&server).personas().await.expect("personas");
    assert_eq!(personas.len(), 1);
    assert_eq!(personas[0].kind, "Budget Shopper");
    assert!(personas[0].has_valid_weights());
}

#[tokio::test]
async fn health_never_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .mount(&server)
        .await;
    let ok = service(&server).health().await;
    assert!(ok.is_healthy());

    let down = HttpSearchService::new("http://127.0.0.1:9", Duration::from_millis(200)).expect("client").health().await;
    assert_eq!(down.status, "unhealthy");
    assert!(down.error.is_some());
}
