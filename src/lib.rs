//! # dice-gateway
//!
//! Real-time multiplayer dice roller. Clients connect over WebSocket,
//! submit roll requests such as `{"user":"Bob","dice":["2d6","1d8"]}`, and
//! every connected client receives the result.
//!
//! Dice are drawn from a quantum random number service when it answers
//! within its timeout, and from the local CSPRNG otherwise.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + ConnectionRegistry (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── RollService (service/)
//!     │
//!     ├── RollEngine (domain/)
//!     ├── EntropySource: quantum RNG → local fallback
//!     │
//!     └── HistoryLog (in memory)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the full application router: REST API, `/ws`, and (with the
/// `swagger-ui` feature) the interactive API docs.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
