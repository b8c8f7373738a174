//! Liveness and readiness probes.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

/// Liveness: the process is up and serving.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness: storage answers a ping.
async fn ready(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store().ping().await?;
    Ok(Json(HealthResponse { status: "ready" }))
}
