//! Data Transfer Objects for REST request/response serialization.
//!
//! Roll requests and payloads reuse the domain types directly so the REST
//! and WebSocket wire shapes cannot drift apart.

pub mod history_dto;
pub mod roll_dto;

pub use history_dto::*;
pub use roll_dto::*;
