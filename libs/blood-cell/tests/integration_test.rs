use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use blood_cell::{blood_routes, BloodState};
use shared_utils::notifier::RecordingNotifier;
use shared_utils::test_utils::TestConfig;

fn create_test_app(dir: &TempDir) -> Router {
    let config = TestConfig::with_history_dir(dir.path()).to_app_config();
    blood_routes(Arc::new(BloodState::from_config(&config, Arc::new(RecordingNotifier::new()))))
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

#[tokio::test]
async fn test_request_lifecycle_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir);

    let (status, created) = send(
        &app,
        "POST",
        "/requests",
        Some(json!({
            "blood_types": ["O+", "AB-"],
            "units_required": 3,
            "location": "Bandra",
            "notify_targets": ["individual_donors"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");
    assert_eq!(created["location"]["named"], "Bandra");
    let id = created["id"].as_str().unwrap().to_string();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let (_, request) = send(&app, "GET", &format!("/requests/{}", id), None).await;
    let acceptors = request["acceptors"].as_array().unwrap();
    assert!(!acceptors.is_empty());
    assert!(acceptors.iter().all(|a| a["kind"] == "individual_donors"));

    let (status, receipt) = send(
        &app,
        "POST",
        &format!("/requests/{}/complete", id),
        Some(json!({ "hospital": "Hinduja Hospital" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["request"]["status"], "completed");
    assert_eq!(receipt["recorded"]["blood_type"], "AB-, O+");
    assert_eq!(receipt["recorded"]["units"], 3);
    assert_eq!(receipt["recorded"]["hospital"], "Hinduja Hospital");

    let (status, _) = send(&app, "GET", &format!("/requests/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = send(&app, "GET", "/history", None).await;
    assert_eq!(history["summary"]["units_donated"], 3);
    assert_eq!(history["summary"]["donations_made"], 1);
    assert!(dir.path().join("blood_donation_history.json").exists());
}

#[tokio::test]
async fn test_history_summary_after_each_append() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir);

    let mut expected_units = 0;
    for (i, units) in [2, 1, 4].into_iter().enumerate() {
        let (status, snapshot) = send(
            &app,
            "POST",
            "/history",
            Some(json!({ "blood_type": "B+", "units": units, "hospital": "Sion Hospital" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        expected_units += units;
        assert_eq!(snapshot["summary"]["units_donated"], expected_units);
        assert_eq!(snapshot["summary"]["donations_made"], i + 1);
    }

    // a second app over the same file sees the same totals
    let (_, history) = send(&create_test_app(&dir), "GET", "/history", None).await;
    assert_eq!(history["summary"]["units_donated"], 7);
    assert_eq!(history["entries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_invalid_requests() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/requests",
        Some(json!({ "blood_types": [], "units_required": 1, "notify_targets": ["ngos_hospitals"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/requests",
        Some(json!({ "blood_types": ["Z+"], "units_required": 1, "notify_targets": ["ngos_hospitals"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_dismiss() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir);

    let (_, created) = send(
        &app,
        "POST",
        "/requests",
        Some(json!({ "blood_types": ["A+"], "units_required": 1, "notify_targets": ["ngos_hospitals"] })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/requests/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(&app, "GET", "/history", None).await;
    assert_eq!(history["summary"]["donations_made"], 0);
}

#[tokio::test]
async fn test_search_and_scan() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir);

    let (status, body) = send(&app, "GET", "/search?medicine=Metformin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "/medicines/donate?medicine=Metformin");

    let (_, body) = send(&app, "GET", "/search?q=blood%20pressure", None).await;
    assert_eq!(body["url"], "/medicines/results?q=blood%20pressure");

    let (status, _) = send(&app, "GET", "/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", "/scan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["medicines"][0], "Paracetamol");
}
