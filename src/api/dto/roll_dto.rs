//! Roll DTOs for the REST entry point.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ResponsePayload;
use crate::service::RollOutcome;

/// Response body for every `POST /rolls` endpoint.
///
/// Carries the same payload every WebSocket client received, plus how
/// many channels it reached.
#[derive(Debug, Serialize, ToSchema)]
pub struct RollResponse {
    /// Broadcast payload.
    #[serde(flatten)]
    pub payload: ResponsePayload,
    /// Number of WebSocket channels the payload was delivered to.
    pub delivered: usize,
}

impl From<RollOutcome> for RollResponse {
    fn from(outcome: RollOutcome) -> Self {
        Self {
            payload: outcome.payload,
            delivered: outcome.report.delivered,
        }
    }
}

/// Request body for the single-die endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SingleRollRequest {
    /// Free-form display name.
    pub user: String,
}
