use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    DraftRequest, FreeTextRequest, Handoff, NegotiateRequest, OpenWizardRequest, SelectCandidateRequest,
    StructuredForm, WizardSnapshot,
};
use crate::services::WizardStore;

#[axum::debug_handler]
pub async fn open_wizard(
    State(store): State<Arc<WizardStore>>,
    Json(payload): Json<OpenWizardRequest>,
) -> Result<(StatusCode, Json<WizardSnapshot>), AppError> {
    let snapshot = store.open(&payload.service, payload.context).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[axum::debug_handler]
pub async fn see_all_packages(
    State(store): State<Arc<WizardStore>>,
    Json(payload): Json<OpenWizardRequest>,
) -> Result<(StatusCode, Json<WizardSnapshot>), AppError> {
    let snapshot = store.open_all_packages(&payload.service, payload.context).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[axum::debug_handler]
pub async fn get_wizard(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(store.get(id).await?))
}

#[axum::debug_handler]
pub async fn update_draft(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DraftRequest>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(store.update_draft(id, &payload.text).await?))
}

#[axum::debug_handler]
pub async fn request_voice_fill(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<WizardSnapshot>), AppError> {
    let snapshot = store.request_voice_fill(id).await?;
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

#[axum::debug_handler]
pub async fn submit_structured(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
    Json(form): Json<StructuredForm>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(store.submit_structured(id, &form).await?))
}

#[axum::debug_handler]
pub async fn submit_free_text(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FreeTextRequest>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(store.submit_free_text(id, &payload.text).await?))
}

#[axum::debug_handler]
pub async fn select_candidate(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectCandidateRequest>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(store.select(id, &payload.candidate_id).await?))
}

#[axum::debug_handler]
pub async fn back_to_candidates(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, AppError> {
    Ok(Json(store.back(id).await?))
}

#[axum::debug_handler]
pub async fn negotiate(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NegotiateRequest>,
) -> Result<Json<Handoff>, AppError> {
    Ok(Json(store.negotiate(id, &payload.message, payload.urgency).await?))
}

#[axum::debug_handler]
pub async fn book_directly(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Handoff>, AppError> {
    Ok(Json(store.book_directly(id).await?))
}

#[axum::debug_handler]
pub async fn close_wizard(
    State(store): State<Arc<WizardStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    store.close(id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Wizard closed"
    })))
}
