//! Roll service: turns inbound roll requests into broadcasts.

use std::sync::Arc;

use crate::domain::{
    DICE_TYPES, EntropySource, HistoryEntry, QuantumEntropy, ResponsePayload, RollEngine,
    RollRequest, RollResult, StandardDie,
};
use crate::error::{DiceError, GatewayError};
use crate::ws::{BroadcastReport, ConnectionRegistry};

/// Result of a request that was rolled and broadcast.
#[derive(Debug, Clone)]
pub struct RollOutcome {
    /// Payload that was sent to every channel.
    pub payload: ResponsePayload,
    /// Delivery summary for the broadcast.
    pub report: BroadcastReport,
}

/// Orchestration layer between client channels and the roll engine.
///
/// Every request follows the same path: decode → validate every notation
/// → roll → assemble payload → broadcast to all registered channels. The
/// requester sees its own result through the broadcast, never through a
/// direct reply.
#[derive(Debug)]
pub struct RollService<S = QuantumEntropy> {
    engine: Arc<RollEngine<S>>,
    registry: Arc<ConnectionRegistry>,
}

impl<S> Clone for RollService<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S: EntropySource> RollService<S> {
    /// Creates a new `RollService`.
    #[must_use]
    pub fn new(engine: Arc<RollEngine<S>>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { engine, registry }
    }

    /// Returns a reference to the inner [`RollEngine`].
    #[must_use]
    pub fn engine(&self) -> &Arc<RollEngine<S>> {
        &self.engine
    }

    /// Returns a reference to the inner [`ConnectionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Handles one raw text frame from a client channel.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Dice`] if the frame is not a roll request
    /// or any notation in it is invalid; nothing is broadcast in that case.
    pub async fn handle_text(&self, text: &str) -> Result<RollOutcome, GatewayError> {
        let request: RollRequest = serde_json::from_str(text)
            .map_err(|e| DiceError::MalformedRequest(e.to_string()))?;
        self.roll_and_broadcast(&request).await
    }

    /// Rolls every notation in `request` and broadcasts the payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Dice`] if any notation is invalid, or
    /// [`GatewayError::Internal`] if the payload cannot be serialized.
    pub async fn roll_and_broadcast(
        &self,
        request: &RollRequest,
    ) -> Result<RollOutcome, GatewayError> {
        let payload = self.engine.roll_request(request).await?;
        self.publish(payload).await
    }

    /// Rolls one die with `sides` faces for `user` and broadcasts it under
    /// the notation `d<sides>`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Dice`] if `sides` is below two.
    pub async fn roll_single_and_broadcast(
        &self,
        user: &str,
        sides: u32,
    ) -> Result<RollOutcome, GatewayError> {
        let face = self.engine.roll_single(user, sides).await?;
        let roll = RollResult::new(format!("d{sides}"), vec![face]);
        self.publish(ResponsePayload::assemble(user, vec![roll])).await
    }

    /// Rolls the standard die at tray position `index` and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `index` is outside the
    /// tray.
    pub async fn roll_standard_and_broadcast(
        &self,
        user: &str,
        index: usize,
    ) -> Result<RollOutcome, GatewayError> {
        let die = StandardDie::from_index(index).ok_or_else(|| {
            GatewayError::InvalidRequest(format!(
                "no standard die at index {index}, the tray holds {}",
                DICE_TYPES.len()
            ))
        })?;
        let face = self.engine.roll_standard(user, die).await;
        let roll = RollResult::new(format!("d{}", die.sides()), vec![face]);
        self.publish(ResponsePayload::assemble(user, vec![roll])).await
    }

    async fn publish(&self, payload: ResponsePayload) -> Result<RollOutcome, GatewayError> {
        let message = serde_json::to_string(&payload)
            .map_err(|e| GatewayError::Internal(format!("payload serialization: {e}")))?;

        let report = self.registry.broadcast(&message).await;
        tracing::info!(
            user = %payload.user,
            grand_total = payload.grand_total,
            delivered = report.delivered,
            "roll broadcast"
        );

        Ok(RollOutcome { payload, report })
    }

    /// Returns the most recent history entries, or all when `limit` is unset.
    pub async fn history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        self.engine.history().recent(limit).await
    }

    /// Empties the history log, returning how many entries were dropped.
    pub async fn clear_history(&self) -> usize {
        let dropped = self.engine.history().clear().await;
        tracing::info!(dropped, "roll history cleared");
        dropped
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::entropy::testing::Unreachable;
    use crate::domain::{ConnectionId, HistoryLog};

    fn service() -> RollService<Unreachable> {
        let engine = RollEngine::new(Unreachable::default(), Arc::new(HistoryLog::new()), 100);
        let registry = ConnectionRegistry::new(Duration::from_millis(50));
        RollService::new(Arc::new(engine), Arc::new(registry))
    }

    async fn connect(service: &RollService<Unreachable>) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(8);
        service.registry().register(id, tx).await;
        (id, rx)
    }

    #[tokio::test]
    async fn request_is_broadcast_to_everyone() {
        let service = service();
        let (_, mut alice) = connect(&service).await;
        let (_, mut bob) = connect(&service).await;

        let outcome = assert_ok!(
            service
                .handle_text(r#"{"user":"Bob","dice":["2d6","1d8"]}"#)
                .await
        );
        assert_eq!(outcome.report.delivered, 2);

        for rx in [&mut alice, &mut bob] {
            let Some(frame) = rx.recv().await else {
                panic!("expected a broadcast frame");
            };
            let Ok(received) = serde_json::from_str::<ResponsePayload>(&frame) else {
                panic!("frame should be a response payload: {frame}");
            };
            assert_eq!(received, outcome.payload);
            assert_eq!(received.user, "Bob");
            let total: u64 = received
                .results
                .values()
                .flatten()
                .map(|&o| u64::from(o))
                .sum();
            assert_eq!(received.grand_total, total);
        }
    }

    #[tokio::test]
    async fn invalid_notation_broadcasts_nothing() {
        let service = service();
        let (_, mut rx) = connect(&service).await;

        let err = assert_err!(
            service
                .handle_text(r#"{"user":"Bob","dice":["2d6","oops"]}"#)
                .await
        );
        assert!(matches!(
            err,
            GatewayError::Dice(DiceError::InvalidNotation { .. })
        ));
        assert!(rx.try_recv().is_err());
        assert!(service.history(None).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let service = service();
        let (_, mut rx) = connect(&service).await;

        for frame in ["not json", r#"{"user":"Bob"}"#, r#"{"user":1,"dice":[]}"#] {
            let err = assert_err!(service.handle_text(frame).await);
            assert!(matches!(
                err,
                GatewayError::Dice(DiceError::MalformedRequest(_))
            ));
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dead_channel_does_not_block_the_others() {
        let service = service();
        let (dead, dead_rx) = connect(&service).await;
        let (alive, mut alive_rx) = connect(&service).await;
        drop(dead_rx);

        let outcome = assert_ok!(
            service
                .handle_text(r#"{"user":"Ann","dice":["1d20"]}"#)
                .await
        );
        assert_eq!(outcome.report.delivered, 1);
        assert!(alive_rx.recv().await.is_some());
        assert!(!service.registry().contains(dead).await);
        assert!(service.registry().contains(alive).await);
    }

    #[tokio::test]
    async fn standard_die_is_rolled_and_broadcast() {
        let service = service();
        let (_, mut rx) = connect(&service).await;

        let outcome = assert_ok!(service.roll_standard_and_broadcast("Ann", 5).await);
        let Some(faces) = outcome.payload.results.get("d20") else {
            panic!("index 5 is the d20");
        };
        assert_eq!(faces.len(), 1);
        assert!(faces.iter().all(|f| (1..=20).contains(f)));
        assert_eq!(outcome.payload.grand_total, faces.iter().map(|&f| u64::from(f)).sum::<u64>());
        assert!(rx.recv().await.is_some());
        assert_eq!(service.history(None).await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_tray_index_is_rejected() {
        let service = service();
        let (_, mut rx) = connect(&service).await;

        let err = assert_err!(service.roll_standard_and_broadcast("Ann", DICE_TYPES.len()).await);
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
        assert!(rx.try_recv().is_err());
        assert!(service.history(None).await.is_empty());
    }

    #[tokio::test]
    async fn single_die_uses_short_notation() {
        let service = service();
        let outcome = assert_ok!(service.roll_single_and_broadcast("Ann", 100).await);
        assert_eq!(outcome.payload.results.keys().collect::<Vec<_>>(), ["d100"]);

        let err = assert_err!(service.roll_single_and_broadcast("Ann", 1).await);
        assert!(matches!(err, GatewayError::Dice(DiceError::InvalidNotation { .. })));
    }

    #[tokio::test]
    async fn history_grows_per_notation_and_clears() {
        let service = service();
        for _ in 0..2 {
            let _ = assert_ok!(
                service
                    .handle_text(r#"{"user":"Bob","dice":["1d4","3d6","2d10"]}"#)
                    .await
            );
        }
        let history = service.history(None).await;
        assert_eq!(history.len(), 6);
        let recent = service.history(Some(2)).await;
        let dice: Vec<&str> = recent.iter().map(|e| e.dice.as_str()).collect();
        assert_eq!(dice, ["3d6", "2d10"]);

        assert_eq!(service.clear_history().await, 6);
        assert!(service.history(None).await.is_empty());
    }
}
