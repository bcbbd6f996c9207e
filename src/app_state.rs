//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::domain::{EntropyError, HistoryLog, QuantumEntropy, RollEngine};
use crate::service::RollService;
use crate::ws::ConnectionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Roll service for all request handling and broadcasting.
    pub roll_service: Arc<RollService>,
    /// Capacity of the outbound queue created for each new connection.
    pub ws_outbound_capacity: usize,
}

impl AppState {
    /// Wires the entropy source, history log, engine, registry, and
    /// service together from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError::Http`] if the quantum RNG client cannot be
    /// built.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, EntropyError> {
        let source = QuantumEntropy::new(
            config.qrng_url.clone(),
            config.qrng_timeout,
            config.qrng_enabled,
        )?;
        let history = Arc::new(HistoryLog::new());
        let engine = Arc::new(RollEngine::new(
            source,
            history,
            config.max_dice_per_notation,
        ));
        let registry = Arc::new(ConnectionRegistry::new(config.ws_send_timeout));

        Ok(Self {
            roll_service: Arc::new(RollService::new(engine, registry)),
            ws_outbound_capacity: config.ws_outbound_capacity,
        })
    }
}
