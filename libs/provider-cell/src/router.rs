use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn provider_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_services))
        .route("/{service}/candidates", get(handlers::get_candidates))
        .route("/{service}/quote", post(handlers::quote))
        .with_state(state)
}
