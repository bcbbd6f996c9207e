//! Service layer: request orchestration.
//!
//! [`RollService`] decodes roll requests, delegates rolling to the
//! [`crate::domain::RollEngine`], and broadcasts results through the
//! [`crate::ws::ConnectionRegistry`].

pub mod roll_service;

pub use roll_service::{RollOutcome, RollService};
