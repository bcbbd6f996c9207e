//! Roll endpoints: the REST twins of the WebSocket roll request.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{RollResponse, SingleRollRequest};
use crate::app_state::AppState;
use crate::domain::RollRequest;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /rolls` — Roll dice and broadcast the result.
///
/// # Errors
///
/// Returns [`GatewayError`] if the body is not a roll request or any
/// notation is invalid. Nothing is rolled or broadcast in that case.
#[utoipa::path(
    post,
    path = "/api/v1/rolls",
    tag = "Rolls",
    summary = "Roll dice",
    description = "Rolls every notation in the request and broadcasts the result to all connected WebSocket clients. One invalid notation rejects the whole request.",
    request_body = RollRequest,
    responses(
        (status = 200, description = "Dice rolled and broadcast", body = RollResponse),
        (status = 400, description = "Malformed body or invalid dice notation", body = ErrorResponse),
    )
)]
pub async fn roll_dice(
    State(state): State<AppState>,
    body: Result<Json<RollRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(req) = body?;
    let outcome = state.roll_service.roll_and_broadcast(&req).await?;
    Ok(Json(RollResponse::from(outcome)))
}

/// `POST /rolls/single/{sides}` — Roll one die of any size.
///
/// # Errors
///
/// Returns [`GatewayError`] if the body is malformed or `sides` is not a
/// valid die size.
#[utoipa::path(
    post,
    path = "/api/v1/rolls/single/{sides}",
    tag = "Rolls",
    summary = "Roll one die",
    description = "Rolls a single die with the given number of faces, recorded and broadcast as `d<sides>`.",
    params(("sides" = u32, Path, description = "Number of faces, at least 2")),
    request_body = SingleRollRequest,
    responses(
        (status = 200, description = "Die rolled and broadcast", body = RollResponse),
        (status = 400, description = "Malformed body or invalid die size", body = ErrorResponse),
    )
)]
pub async fn roll_single(
    State(state): State<AppState>,
    sides: Result<Path<u32>, PathRejection>,
    body: Result<Json<SingleRollRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Path(sides) = sides?;
    let Json(req) = body?;
    let outcome = state
        .roll_service
        .roll_single_and_broadcast(&req.user, sides)
        .await?;
    Ok(Json(RollResponse::from(outcome)))
}

/// `POST /rolls/standard/{index}` — Roll one die from the standard tray.
///
/// # Errors
///
/// Returns [`GatewayError`] if the body is malformed or `index` is outside
/// the tray listed by `GET /config/dice`.
#[utoipa::path(
    post,
    path = "/api/v1/rolls/standard/{index}",
    tag = "Rolls",
    summary = "Roll a standard die",
    description = "Rolls the die at the given position of the standard tray (0 is the d4, 5 the d20).",
    params(("index" = usize, Path, description = "Tray position, 0-based")),
    request_body = SingleRollRequest,
    responses(
        (status = 200, description = "Die rolled and broadcast", body = RollResponse),
        (status = 400, description = "Malformed body or unknown tray position", body = ErrorResponse),
    )
)]
pub async fn roll_standard(
    State(state): State<AppState>,
    index: Result<Path<usize>, PathRejection>,
    body: Result<Json<SingleRollRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Path(index) = index?;
    let Json(req) = body?;
    let outcome = state
        .roll_service
        .roll_standard_and_broadcast(&req.user, index)
        .await?;
    Ok(Json(RollResponse::from(outcome)))
}

/// Roll routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rolls", post(roll_dice))
        .route("/rolls/single/{sides}", post(roll_single))
        .route("/rolls/standard/{index}", post(roll_standard))
}
