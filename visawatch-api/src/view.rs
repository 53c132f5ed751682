use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use visawatch_core::SearchQuery;

use crate::dashboard::{DashboardView, ExtensionForm};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct UpdateFormRequest {
    extension_days: Option<String>,
    reason: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/dashboard", get(get_dashboard))
        .route("/v1/dashboard/query", put(set_query))
        .route("/v1/dashboard/form", put(update_form))
        .route("/v1/dashboard/refresh", post(refresh))
}

/// GET /v1/dashboard
async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.read().await.view())
}

/// PUT /v1/dashboard/query
async fn set_query(State(state): State<AppState>, Json(query): Json<SearchQuery>) -> Json<DashboardView> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.set_query(query);
    Json(dashboard.view())
}

/// PUT /v1/dashboard/form
async fn update_form(State(state): State<AppState>, Json(req): Json<UpdateFormRequest>) -> Json<ExtensionForm> {
    Json(state.dashboard.write().await.update_form(req.extension_days, req.reason))
}

/// POST /v1/dashboard/refresh
async fn refresh(State(state): State<AppState>) -> Json<DashboardView> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.reset();
    Json(dashboard.view())
}
