//! Type-safe identifier for a connected client channel.
//!
//! [`ConnectionId`] is a newtype wrapper around [`uuid::Uuid`] (v4). The
//! WebSocket handler mints one per accepted upgrade, so the identity of a
//! channel is unique for its whole connected lifetime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one connected client channel.
///
/// Used as the key in [`crate::ws::ConnectionRegistry`] and as a tracing
/// field on every log line about the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ConnectionId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
