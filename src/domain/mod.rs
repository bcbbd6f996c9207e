//! Domain layer: dice notation, entropy, roll engine, and history.
//!
//! This module contains the roll pipeline: notation parsing into
//! [`DiceSpec`], outcome generation against an [`EntropySource`] with a
//! local fallback, the [`RollEngine`] that assembles broadcast payloads,
//! and the process-wide [`HistoryLog`].

pub mod connection_id;
pub mod entropy;
pub mod history_log;
pub mod notation;
pub mod roll;
pub mod roll_engine;

pub use connection_id::ConnectionId;
pub use entropy::{EntropyError, EntropySource, QuantumEntropy};
pub use history_log::{HistoryEntry, HistoryLog};
pub use notation::{DiceSpec, parse_notation};
pub use roll::{DICE_TYPES, ResponsePayload, RollRequest, RollResult, StandardDie};
pub use roll_engine::RollEngine;
