use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::services::WizardStore;

pub fn wizard_routes(store: Arc<WizardStore>) -> Router {
    Router::new()
        .route("/", post(handlers::open_wizard))
        .route("/packages", post(handlers::see_all_packages))
        .route("/{id}", get(handlers::get_wizard).delete(handlers::close_wizard))
        .route("/{id}/draft", put(handlers::update_draft))
        .route("/{id}/voice-fill", post(handlers::request_voice_fill))
        .route("/{id}/requirements/structured", post(handlers::submit_structured))
        .route("/{id}/requirements/free-text", post(handlers::submit_free_text))
        .route("/{id}/select", post(handlers::select_candidate))
        .route("/{id}/back", post(handlers::back_to_candidates))
        .route("/{id}/negotiate", post(handlers::negotiate))
        .route("/{id}/book", post(handlers::book_directly))
        .with_state(store)
}
