//! Roll history handlers: recent entries and operational clear.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ClearHistoryResponse, HistoryQuery, HistoryResponse};
use crate::app_state::AppState;

/// `GET /history` — Most recent rolls, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "History",
    summary = "List roll history",
    description = "Returns the last `limit` rolled notations in roll order, or the whole log when `limit` is omitted.",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Roll history", body = HistoryResponse),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let entries = state.roll_service.history(query.limit).await;
    let total = entries.len();
    Json(HistoryResponse { entries, total })
}

/// `DELETE /history` — Empty the roll history.
#[utoipa::path(
    delete,
    path = "/api/v1/history",
    tag = "History",
    summary = "Clear roll history",
    description = "Operational affordance: drops every recorded roll. Does not affect connected clients.",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
    )
)]
pub async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    let cleared = state.roll_service.clear_history().await;
    Json(ClearHistoryResponse { cleared })
}

/// History routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/history", get(list_history).delete(clear_history))
}
