//! System endpoints: health check and dice catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::DICE_TYPES;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    connections: usize,
    quantum_rng: bool,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and the number of connected WebSocket clients.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.roll_service;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            connections: service.registry().len().await,
            quantum_rng: service.engine().source().is_enabled(),
        }),
    )
}

/// `GET /config/dice` — Standard dice offered by the client tray.
#[utoipa::path(
    get,
    path = "/config/dice",
    tag = "System",
    summary = "List standard dice",
    description = "Returns the side counts of the standard dice the client offers. Any `<count>d<sides>` notation is accepted regardless.",
    responses(
        (status = 200, description = "Standard die sizes", body = Vec<u32>),
    )
)]
pub async fn dice_types_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(DICE_TYPES))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/dice", get(dice_types_handler))
}
