//! OpenAPI document for the REST surface.
//!
//! The WebSocket protocol is not described here; its request and payload
//! schemas are listed as components so clients can share them.

use utoipa::OpenApi;

use crate::api::dto::{ClearHistoryResponse, HistoryResponse, RollResponse, SingleRollRequest};
use crate::api::handlers::{history, roll, system};
use crate::domain::{HistoryEntry, ResponsePayload, RollRequest};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "dice-gateway",
        description = "Real-time multiplayer dice roller. Roll results are broadcast to every client connected at `/ws`."
    ),
    paths(
        roll::roll_dice,
        roll::roll_single,
        roll::roll_standard,
        history::list_history,
        history::clear_history,
        system::health_handler,
        system::dice_types_handler,
    ),
    components(schemas(
        RollRequest,
        ResponsePayload,
        RollResponse,
        SingleRollRequest,
        HistoryEntry,
        HistoryResponse,
        ClearHistoryResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Rolls", description = "Dice rolling"),
        (name = "History", description = "Roll audit log"),
        (name = "System", description = "Health and catalog"),
    )
)]
pub struct ApiDoc;
