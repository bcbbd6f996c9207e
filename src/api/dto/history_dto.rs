//! Roll history DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::HistoryEntry;

/// Query parameters for `GET /history`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Return only the most recent `limit` entries. Omitted or `0` returns
    /// the whole log.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Response body for `GET /history`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Entries in roll order, oldest first.
    pub entries: Vec<HistoryEntry>,
    /// Number of entries returned.
    pub total: usize,
}

/// Response body for `DELETE /history`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    /// Number of entries removed.
    pub cleared: usize,
}
