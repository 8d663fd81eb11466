//! Liveness endpoint.

use super::AppState;
use crate::domain::dto::HealthResponse;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::warn;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.lifecycle.pending().await {
        Ok(pending) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version: crate::VERSION,
                pending_transitions: Some(pending.len()),
            }),
        ),
        Err(err) => {
            warn!(error = %err, "Pending store unreadable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    version: crate::VERSION,
                    pending_transitions: None,
                }),
            )
        }
    }
}
