//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::ConnectionId;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let roll_service = Arc::clone(&state.roll_service);
    let capacity = state.ws_outbound_capacity;
    let conn_id = ConnectionId::new();

    tracing::info!(%conn_id, "ws upgrade requested");
    ws.on_upgrade(move |socket| run_connection(socket, conn_id, roll_service, capacity))
}
