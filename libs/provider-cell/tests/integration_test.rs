use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use provider_cell::router::provider_routes;
use shared_utils::test_utils::TestConfig;

fn create_test_app() -> Router {
    provider_routes(TestConfig::default().to_arc())
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_list_services() {
    let request = Request::builder().method("GET").uri("/").body(Body::empty()).unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = read_json(response).await;
    assert_eq!(json_response["total"], 3);
}

#[tokio::test]
async fn test_get_candidates_default_packages() {
    let request = Request::builder()
        .method("GET")
        .uri("/dietitian/candidates")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = read_json(response).await;
    assert_eq!(json_response["service"], "dietician");
    assert_eq!(json_response["candidates"].as_array().unwrap().len(), 4);
    assert_eq!(json_response["recommendation"]["recommended_candidate_id"], "dt-1");
    assert_eq!(json_response["candidates"][0]["recommended"], true);
    assert_eq!(json_response["candidates"][0]["package"]["session_count"], 24);
}

#[tokio::test]
async fn test_quote_free_text_scenario() {
    let request = Request::builder()
        .method("POST")
        .uri("/dietician/quote")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({
                "mode": "free_text",
                "raw_text": "I need an experienced female dietitian in Mumbai"
            })
            .to_string(),
        ))
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = read_json(response).await;
    assert_eq!(json_response["recommendation"]["recommended_candidate_id"], "dt-1");
    assert_eq!(json_response["recommendation"]["reason"], "Located in Mumbai");
}

#[tokio::test]
async fn test_quote_rejects_unknown_budget_label() {
    let request = Request::builder()
        .method("POST")
        .uri("/dietician/quote")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({
                "mode": "structured",
                "duration": "3 months",
                "sessions_per_week": 2,
                "budget_range": "lots"
            })
            .to_string(),
        ))
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_service_returns_not_found() {
    let request = Request::builder()
        .method("GET")
        .uri("/astrology/candidates")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_rejects_out_of_range_weekly_sessions() {
    for sessions_per_week in [0u64, 100_000_000] {
        let request = Request::builder()
            .method("POST")
            .uri("/dietician/quote")
            .header("Content-Type", "application/json")
            .body(Body::from(
                json!({
                    "mode": "structured",
                    "duration": "1 year",
                    "sessions_per_week": sessions_per_week
                })
                .to_string(),
            ))
            .unwrap();

        let response = create_test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "sessions_per_week = {}", sessions_per_week);

        let json_response = read_json(response).await;
        assert!(json_response["error"].as_str().unwrap().contains("sessions_per_week"));
    }
}
