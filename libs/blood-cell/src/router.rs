use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::BloodState;

pub fn blood_routes(state: Arc<BloodState>) -> Router {
    Router::new()
        .route("/requests", post(handlers::create_request))
        .route("/requests/{id}", get(handlers::get_request).delete(handlers::dismiss_request))
        .route("/requests/{id}/complete", post(handlers::complete_request))
        .route("/history", get(handlers::get_history).post(handlers::append_history))
        .route("/search", get(handlers::search))
        .route("/scan", post(handlers::scan_prescription))
        .with_state(state)
}
