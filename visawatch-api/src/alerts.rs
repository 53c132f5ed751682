use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::warn;
use uuid::Uuid;

use crate::dashboard::UnreadAlerts;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct MarkReadResponse {
    alert_id: Uuid,
    found: bool,
    unread_alerts: usize,
}

#[derive(Debug, Serialize)]
struct MarkAllReadResponse {
    marked: usize,
    unread_alerts: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/alerts/unread", get(list_unread))
        .route("/v1/alerts/read-all", post(mark_all_read))
        .route("/v1/alerts/{id}/read", post(mark_read))
        .route("/v1/events", get(stream_events))
}

/// GET /v1/alerts/unread
async fn list_unread(State(state): State<AppState>) -> Json<UnreadAlerts> {
    Json(state.dashboard.read().await.unread_alerts())
}

/// POST /v1/alerts/{id}/read
///
/// Unknown ids are not an error.
async fn mark_read(State(state): State<AppState>, Path(alert_id): Path<Uuid>) -> Json<MarkReadResponse> {
    let mut dashboard = state.dashboard.write().await;
    let found = dashboard.mark_alert_read(&alert_id);
    Json(MarkReadResponse {
        alert_id,
        found,
        unread_alerts: dashboard.stats().unread_alerts,
    })
}

/// POST /v1/alerts/read-all
async fn mark_all_read(State(state): State<AppState>) -> Json<MarkAllReadResponse> {
    let mut dashboard = state.dashboard.write().await;
    let marked = dashboard.mark_all_read();
    Json(MarkAllReadResponse {
        marked,
        unread_alerts: dashboard.stats().unread_alerts,
    })
}

/// GET /v1/events
async fn stream_events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => match Event::default().event(event.name()).json_data(&event) {
                Ok(sse) => Some(Ok(sse)),
                Err(e) => {
                    warn!("Failed to encode dashboard event: {}", e);
                    None
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!("Event subscriber lagged, {} events dropped", skipped);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
