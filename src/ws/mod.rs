//! WebSocket layer: connection handling and broadcast fan-out.
//!
//! The WebSocket endpoint at `/ws` accepts roll requests and delivers
//! every roll result to every connected client.

pub mod connection;
pub mod handler;
pub mod registry;

pub use registry::{BroadcastReport, ConnectionRegistry, ConnectionSender, SendFailure};
