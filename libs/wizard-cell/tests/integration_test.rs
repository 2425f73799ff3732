use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_utils::notifier::RecordingNotifier;
use shared_utils::test_utils::TestConfig;
use wizard_cell::{wizard_routes, WizardStore, VOICE_FILL_SENTENCE};

fn create_test_app() -> Router {
    let config = TestConfig::default().to_app_config();
    wizard_routes(Arc::new(WizardStore::new(&config, Arc::new(RecordingNotifier::new()))))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

async fn open(app: &Router, service: &str) -> String {
    let (status, body) = send(app, "POST", "/", Some(json!({ "service": service }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["stage"], "requirements_capture");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_structured_flow_to_negotiation() {
    let app = create_test_app();
    let id = open(&app, "dietician").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/{}/requirements/structured", id),
        Some(json!({
            "duration": "3 months",
            "sessions_per_week": "2",
            "preferred_days": ["Monday", "Friday"],
            "gender_preference": "Female",
            "health_goals": "weight loss"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "candidate_review");
    assert_eq!(body["candidates"]["candidates"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["candidates"]["candidates"][0]["package"]["schedule"],
        "2 sessions per week on Monday, Friday"
    );

    let (status, body) = send(&app, "POST", &format!("/{}/select", id), Some(json!({ "candidate_id": "dt-1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "connection_choice");
    assert_eq!(body["connection"]["negotiation"]["default_urgency"], "normal");
    assert_eq!(body["connection"]["direct_booking"]["session_count"], 24);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/{}/negotiate", id),
        Some(json!({ "message": "Can we do evenings?", "urgency": "high" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completion"], "negotiation");
    assert_eq!(
        body["url"],
        "/services/negotiation?specialist=dt-1&service=dietician&message=Can%20we%20do%20evenings%3F&urgency=high"
    );

    let (status, _) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_structured_submit_requires_fields() {
    let app = create_test_app();
    let id = open(&app, "yoga").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/{}/requirements/structured", id),
        Some(json!({ "duration": "3 months" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sessions_per_week"));

    let (_, body) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(body["stage"], "requirements_capture");
}

#[tokio::test]
async fn test_free_text_flow_to_direct_booking() {
    let app = create_test_app();
    let id = open(&app, "dietician").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/{}/requirements/free-text", id),
        Some(json!({ "text": "I need an experienced female dietitian in Mumbai" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidates"]["recommendation"]["recommended_candidate_id"], "dt-1");

    send(&app, "POST", &format!("/{}/select", id), Some(json!({ "candidate_id": "dt-3" }))).await;

    let (status, _) = send(&app, "POST", &format!("/{}/negotiate", id), Some(json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "POST", &format!("/{}/book", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completion"], "direct_booking");
    assert_eq!(body["url"], "/services/booking?specialist=dt-3&service=dietician");
}

#[tokio::test]
async fn test_see_all_packages_and_back() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/packages", Some(json!({ "service": "physiotherapy" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["stage"], "candidate_review");
    assert_eq!(body["candidates"]["candidates"].as_array().unwrap().len(), 4);
    let id = body["id"].as_str().unwrap().to_string();

    send(&app, "POST", &format!("/{}/select", id), Some(json!({ "candidate_id": "pt-1" }))).await;
    let (status, body) = send(&app, "POST", &format!("/{}/back", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "candidate_review");
    assert!(body["connection"].is_null());
}

#[tokio::test]
async fn test_voice_fill_fills_draft() {
    let app = create_test_app();
    let id = open(&app, "dietician").await;

    let (_, body) = send(&app, "PUT", &format!("/{}/draft", id), Some(json!({ "text": "Hello" }))).await;
    assert_eq!(body["can_submit_draft"], true);
    let (status, body) = send(&app, "POST", &format!("/{}/voice-fill", id), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["voice_fill_pending"], true);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let (_, body) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(body["draft_text"], format!("Hello {}", VOICE_FILL_SENTENCE));

    // empty text falls back to the filled draft
    let (status, body) = send(&app, "POST", &format!("/{}/requirements/free-text", id), Some(json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidates"]["requirements"]["raw_text"], format!("Hello {}", VOICE_FILL_SENTENCE));
}

#[tokio::test]
async fn test_out_of_order_actions_conflict() {
    let app = create_test_app();
    let id = open(&app, "yoga").await;

    let (status, _) = send(&app, "POST", &format!("/{}/book", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "POST", &format!("/{}/select", id), Some(json!({ "candidate_id": "yg-1" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_close_and_unknown_ids() {
    let app = create_test_app();
    let id = open(&app, "dietician").await;

    let (status, body) = send(&app, "DELETE", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, "DELETE", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/", Some(json!({ "service": "astrology" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
