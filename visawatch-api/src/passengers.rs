use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use visawatch_core::{PassengerPatch, SearchQuery};

use crate::dashboard::{
    ActionReceipt, AddedPassenger, ExtensionOutcome, PassengerDetail, PassengerSummary, SentAlert,
};
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ExtendVisaRequest {
    /// Raw form text; validated by the workflow
    pub extension_days: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendAlertRequest {
    pub message: Option<String>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/passengers", get(list_passengers).post(add_passenger))
        .route("/v1/passengers/{id}", get(get_passenger).patch(edit_passenger))
        .route("/v1/passengers/{id}/select", post(select_passenger))
        .route("/v1/passengers/{id}/extensions", post(extend_visa))
        .route("/v1/passengers/{id}/alerts", post(send_alert))
}

/// GET /v1/passengers?search=&status=
async fn list_passengers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<PassengerSummary>> {
    Json(state.dashboard.read().await.list(&query))
}

/// POST /v1/passengers
async fn add_passenger(State(state): State<AppState>) -> Result<Json<ActionReceipt<AddedPassenger>>, AppError> {
    Ok(Json(state.dashboard.write().await.add_passenger()?))
}

/// GET /v1/passengers/{id}
async fn get_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PassengerDetail>, AppError> {
    Ok(Json(state.dashboard.read().await.detail(&id)?))
}

/// PATCH /v1/passengers/{id}
async fn edit_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PassengerPatch>,
) -> Result<Json<PassengerDetail>, AppError> {
    Ok(Json(state.dashboard.write().await.edit_passenger(&id, patch)?))
}

/// POST /v1/passengers/{id}/select
async fn select_passenger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PassengerDetail>, AppError> {
    Ok(Json(state.dashboard.write().await.select(&id)?))
}

/// POST /v1/passengers/{id}/extensions
async fn extend_visa(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ExtendVisaRequest>>,
) -> Result<Json<ActionReceipt<ExtensionOutcome>>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let receipt = state
        .dashboard
        .write()
        .await
        .submit_extension(&id, req.extension_days, req.reason)?;
    Ok(Json(receipt))
}

/// POST /v1/passengers/{id}/alerts
async fn send_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<SendAlertRequest>>,
) -> Result<Json<ActionReceipt<SentAlert>>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    Ok(Json(state.dashboard.write().await.send_alert(&id, req.message)?))
}
