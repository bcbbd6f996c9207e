//! Process-wide roll history.
//!
//! [`HistoryLog`] is an append-only, insertion-ordered log of every notation
//! rolled since process start. It lives in memory only and grows until it
//! is explicitly cleared.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// One rolled notation, as recorded for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HistoryEntry {
    /// Display name of the roller.
    pub user: String,
    /// Notation that was rolled, e.g. `"2d6"`.
    pub dice: String,
    /// Individual outcomes in roll order.
    pub results: Vec<u32>,
    /// When the roll finished.
    pub rolled_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(user: impl Into<String>, dice: impl Into<String>, results: Vec<u32>) -> Self {
        Self {
            user: user.into(),
            dice: dice.into(),
            results,
            rolled_at: Utc::now(),
        }
    }
}

/// Append-only roll log shared by every connection.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl HistoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry at the end of the log.
    pub async fn append(&self, entry: HistoryEntry) {
        self.entries.write().await.push(entry);
    }

    /// Returns the last `limit` entries in insertion order.
    ///
    /// `None` and `Some(0)` both return the whole log.
    pub async fn recent(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let entries = self.entries.read().await;
        let skip = match limit {
            Some(n) if n > 0 => entries.len().saturating_sub(n),
            _ => 0,
        };
        entries.iter().skip(skip).cloned().collect()
    }

    /// Removes every entry, returning how many were dropped.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        dropped
    }

    /// Number of entries currently in the log.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if nothing has been rolled since the last clear.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
