use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CandidateList, RequirementsRecord};
use crate::services::catalog::ServiceKind;
use crate::services::quote::QuoteService;

#[axum::debug_handler]
pub async fn list_services() -> Json<Value> {
    let services: Vec<Value> = ServiceKind::ALL
        .iter()
        .map(|s| json!({ "slug": s.slug(), "name": s.display_name() }))
        .collect();

    Json(json!({
        "services": services,
        "total": services.len()
    }))
}

#[axum::debug_handler]
pub async fn get_candidates(
    State(state): State<Arc<AppConfig>>,
    Path(service): Path<String>,
) -> Result<Json<CandidateList>, AppError> {
    let quote_service = QuoteService::new(&state);
    let service = quote_service.resolve_service(&service)?;

    Ok(Json(quote_service.all_packages(service)))
}

#[axum::debug_handler]
pub async fn quote(
    State(state): State<Arc<AppConfig>>,
    Path(service): Path<String>,
    Json(requirements): Json<RequirementsRecord>,
) -> Result<Json<CandidateList>, AppError> {
    let quote_service = QuoteService::new(&state);
    let service = quote_service.resolve_service(&service)?;
    requirements.validate()?;

    Ok(Json(quote_service.quote(service, requirements)))
}
