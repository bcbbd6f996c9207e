//! WebSocket connection loop.
//!
//! Each connection runs two tasks: this read loop, which turns inbound
//! text frames into roll requests, and a writer task that drains the
//! connection's outbound queue into the socket. The queue's sender is what
//! the [`super::ConnectionRegistry`] broadcasts into.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::ConnectionId;
use crate::service::RollService;

/// Runs a single WebSocket connection until the client goes away.
///
/// - Registers the connection, then reads frames one at a time.
/// - Rejected requests are logged and produce no broadcast; the
///   connection stays open.
/// - On close or read error the connection is unregistered.
pub async fn run_connection(
    socket: WebSocket,
    conn_id: ConnectionId,
    roll_service: Arc<RollService>,
    outbound_capacity: usize,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<String>(outbound_capacity);

    let registry = Arc::clone(roll_service.registry());
    registry.register(conn_id, out_tx).await;

    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if let Err(e) = ws_tx.send(Message::text(frame)).await {
                tracing::debug!(%conn_id, error = %e, "ws write failed");
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = roll_service.handle_text(text.as_str()).await {
                    tracing::warn!(%conn_id, error = %e, "roll request rejected");
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "ws read failed");
                break;
            }
        }
    }

    registry.unregister(conn_id).await;
    writer.abort();
    tracing::debug!(%conn_id, "ws connection closed");
}
