//! Live set of connected client channels and broadcast fan-out.
//!
//! Each WebSocket connection owns a bounded outbound queue drained by its
//! writer task; the registry holds the sending half, keyed by
//! [`ConnectionId`]. Broadcasting snapshots the senders under the read lock
//! and then delivers with no lock held, so concurrent read-loops can
//! register, unregister, and broadcast without blocking each other for the
//! duration of a send.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::SendTimeoutError};

use crate::domain::ConnectionId;

/// Sending half of a connection's outbound queue.
pub type ConnectionSender = mpsc::Sender<String>;

/// Why a message could not be handed to one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// The connection's writer task is gone.
    Closed,
    /// The outbound queue stayed full for the whole send timeout.
    TimedOut,
}

/// Outcome of one [`ConnectionRegistry::broadcast`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Channels that accepted the message.
    pub delivered: usize,
    /// Channels that failed and were unregistered.
    pub failed: Vec<(ConnectionId, SendFailure)>,
}

/// Registry of every currently-open client channel.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionSender>>,
    send_timeout: Duration,
}

impl ConnectionRegistry {
    /// Creates an empty registry; each per-channel send waits at most
    /// `send_timeout` for queue space.
    #[must_use]
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            send_timeout,
        }
    }

    /// Adds a channel whose handshake has completed.
    ///
    /// Registering an id that is already present replaces its sender, so
    /// a channel is never listed twice. Returns `true` if the id was new.
    pub async fn register(&self, id: ConnectionId, sender: ConnectionSender) -> bool {
        let mut map = self.connections.write().await;
        let is_new = map.insert(id, sender).is_none();
        tracing::info!(conn_id = %id, connections = map.len(), "channel registered");
        is_new
    }

    /// Removes a channel if present. Returns `true` if it was registered.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut map = self.connections.write().await;
        let removed = map.remove(&id).is_some();
        if removed {
            tracing::info!(conn_id = %id, connections = map.len(), "channel unregistered");
        }
        removed
    }

    /// Sends `message` to every registered channel.
    ///
    /// Sends run concurrently, so the whole fan-out waits at most one
    /// `send_timeout` however many channels are stalled. A failing channel
    /// never stops delivery to the rest; every channel that failed is
    /// unregistered once the fan-out completes.
    pub async fn broadcast(&self, message: &str) -> BroadcastReport {
        let targets: Vec<(ConnectionId, ConnectionSender)> = {
            let map = self.connections.read().await;
            map.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let sends = targets.into_iter().map(|(id, tx)| async move {
            let sent = tx.send_timeout(message.to_string(), self.send_timeout).await;
            (id, sent)
        });

        let mut report = BroadcastReport::default();
        for (id, sent) in join_all(sends).await {
            match sent {
                Ok(()) => report.delivered += 1,
                Err(SendTimeoutError::Closed(_)) => report.failed.push((id, SendFailure::Closed)),
                Err(SendTimeoutError::Timeout(_)) => {
                    report.failed.push((id, SendFailure::TimedOut));
                }
            }
        }

        for (id, reason) in &report.failed {
            tracing::warn!(conn_id = %id, ?reason, "send failed, dropping channel");
            self.unregister(*id).await;
        }

        tracing::debug!(
            delivered = report.delivered,
            failed = report.failed.len(),
            "broadcast complete"
        );
        report
    }

    /// Returns `true` if `id` is currently registered.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    /// Number of registered channels.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no channel is registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
