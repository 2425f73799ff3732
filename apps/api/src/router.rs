use std::sync::Arc;

use axum::{routing::get, Router};

use blood_cell::{blood_routes, BloodState};
use provider_cell::router::provider_routes;
use shared_config::AppConfig;
use shared_utils::notifier::Notifier;
use wizard_cell::{wizard_routes, WizardStore};

pub fn create_router(config: Arc<AppConfig>, notifier: Arc<dyn Notifier>) -> Router {
    let wizards = Arc::new(WizardStore::new(&config, notifier.clone()));
    let blood = Arc::new(BloodState::from_config(&config, notifier));

    Router::new()
        .route("/", get(|| async { "MedSupport request API is running!" }))
        .nest("/services", provider_routes(config))
        .nest("/wizards", wizard_routes(wizards))
        .nest("/blood", blood_routes(blood))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use shared_utils::notifier::RecordingNotifier;
    use shared_utils::test_utils::TestConfig;
    use tower::ServiceExt;

    fn app(dir: &std::path::Path) -> Router {
        create_router(
            TestConfig::with_history_dir(dir).to_arc(),
            Arc::new(RecordingNotifier::new()),
        )
    }

    #[tokio::test]
    async fn test_cells_are_nested() {
        let dir = tempfile::tempdir().unwrap();

        for uri in ["/", "/services", "/services/yoga/candidates", "/blood/history"] {
            let response = app(dir.path())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        }
    }

    #[tokio::test]
    async fn test_errors_are_json() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/wizards/00000000-0000-0000-0000-000000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Wizard not found"));
    }
}
