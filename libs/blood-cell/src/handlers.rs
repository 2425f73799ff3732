use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::navigation::NavigationTarget;

use crate::models::{
    BloodError, BloodRequest, CompleteBloodRequest, CompletionReceipt, CreateBloodRequest, HistorySnapshot,
    NewDonation, ScanResult, SearchQuery,
};
use crate::services::{search_target, simulate_scan, BloodState};

#[axum::debug_handler]
pub async fn create_request(
    State(state): State<Arc<BloodState>>,
    Json(payload): Json<CreateBloodRequest>,
) -> Result<(StatusCode, Json<BloodRequest>), AppError> {
    let request = state.requests.create(payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[axum::debug_handler]
pub async fn get_request(
    State(state): State<Arc<BloodState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BloodRequest>, AppError> {
    Ok(Json(state.requests.get(id).await?))
}

#[axum::debug_handler]
pub async fn complete_request(
    State(state): State<Arc<BloodState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteBloodRequest>,
) -> Result<Json<CompletionReceipt>, AppError> {
    Ok(Json(state.requests.complete(id, payload).await?))
}

#[axum::debug_handler]
pub async fn dismiss_request(
    State(state): State<Arc<BloodState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.requests.dismiss(id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Blood request dismissed"
    })))
}

#[axum::debug_handler]
pub async fn get_history(State(state): State<Arc<BloodState>>) -> Result<Json<HistorySnapshot>, AppError> {
    let snapshot = state.history.snapshot().await.map_err(BloodError::from)?;
    Ok(Json(snapshot))
}

#[axum::debug_handler]
pub async fn append_history(
    State(state): State<Arc<BloodState>>,
    Json(payload): Json<NewDonation>,
) -> Result<(StatusCode, Json<HistorySnapshot>), AppError> {
    let snapshot = state.history.record(payload).await.map_err(BloodError::from)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[axum::debug_handler]
pub async fn search(Query(query): Query<SearchQuery>) -> Result<Json<Value>, AppError> {
    let target: NavigationTarget = search_target(&query)?;

    Ok(Json(json!({
        "url": target.to_url(),
        "target": target
    })))
}

#[axum::debug_handler]
pub async fn scan_prescription(State(state): State<Arc<BloodState>>) -> Result<Json<ScanResult>, AppError> {
    let result = simulate_scan(&state.scan_latency).await.map_err(BloodError::from)?;
    Ok(Json(result))
}
