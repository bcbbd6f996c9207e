//! Roll engine: validates notation, draws outcomes, records history.

use std::sync::Arc;

use super::entropy::{BYTE_SPAN, EntropySource, QuantumEntropy, byte_to_face, local_roll};
use super::history_log::{HistoryEntry, HistoryLog};
use super::notation::{DiceSpec, parse_notation};
use super::roll::{ResponsePayload, RollRequest, RollResult, StandardDie};
use crate::error::DiceError;

/// Executes roll requests against an [`EntropySource`].
///
/// Each die is drawn independently: the external source is tried first
/// and any failure falls back to the local CSPRNG, so a roll always
/// completes with an in-range outcome. Every rolled notation appends one
/// [`HistoryEntry`] to the engine's [`HistoryLog`].
#[derive(Debug)]
pub struct RollEngine<S = QuantumEntropy> {
    source: S,
    history: Arc<HistoryLog>,
    max_dice_per_notation: u32,
}

impl<S: EntropySource> RollEngine<S> {
    /// Creates an engine drawing from `source` and recording into `history`.
    #[must_use]
    pub fn new(source: S, history: Arc<HistoryLog>, max_dice_per_notation: u32) -> Self {
        Self {
            source,
            history,
            max_dice_per_notation,
        }
    }

    /// The log every roll is recorded in.
    #[must_use]
    pub fn history(&self) -> &Arc<HistoryLog> {
        &self.history
    }

    /// The entropy source tried before the local fallback.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parses `notation` and applies the per-notation dice limit.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::InvalidNotation`] if the notation is malformed
    /// or asks for more dice than the engine allows.
    pub fn validate(&self, notation: &str) -> Result<DiceSpec, DiceError> {
        let spec = parse_notation(notation)?;
        if spec.count() > self.max_dice_per_notation {
            return Err(DiceError::invalid(notation, "too many dice in one notation"));
        }
        Ok(spec)
    }

    /// Rolls one die with `sides` faces. Never fails.
    ///
    /// Dice larger than one external byte can cover go straight to the
    /// local generator.
    pub async fn roll_one(&self, sides: u32) -> u32 {
        if sides > BYTE_SPAN {
            return local_roll(sides);
        }
        let drawn = match self.source.next_byte().await {
            Ok(byte) => byte_to_face(byte, sides),
            Err(e) => Err(e),
        };
        match drawn {
            Ok(face) => face,
            Err(e) => {
                tracing::debug!(error = %e, sides, "external entropy unavailable, using local rng");
                local_roll(sides)
            }
        }
    }

    /// Rolls every die described by `spec` and records one history entry.
    pub async fn roll_many(&self, user: &str, notation: &str, spec: DiceSpec) -> Vec<u32> {
        // `spec` may not have gone through `validate`.
        let capacity = spec.count().min(self.max_dice_per_notation);
        let mut outcomes = Vec::with_capacity(usize::try_from(capacity).unwrap_or_default());
        for _ in 0..spec.count() {
            outcomes.push(self.roll_one(spec.sides()).await);
        }

        tracing::info!(user, notation, ?outcomes, "dice rolled");
        self.history
            .append(HistoryEntry::new(user, notation, outcomes.clone()))
            .await;
        outcomes
    }

    /// Rolls a single die of `sides` faces, recorded as `d<sides>`.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::InvalidNotation`] if `sides` is below two.
    pub async fn roll_single(&self, user: &str, sides: u32) -> Result<u32, DiceError> {
        let spec = DiceSpec::new(1, sides)?;
        let outcomes = self.roll_many(user, &format!("d{sides}"), spec).await;
        Ok(outcomes.first().copied().unwrap_or_else(|| local_roll(sides)))
    }

    /// Rolls one of the standard tray dice.
    pub async fn roll_standard(&self, user: &str, die: StandardDie) -> u32 {
        let sides = die.sides();
        let outcomes = self
            .roll_many(user, &format!("d{sides}"), DiceSpec::from(die))
            .await;
        outcomes.first().copied().unwrap_or_else(|| local_roll(sides))
    }

    /// Validates every notation, then rolls them in order.
    ///
    /// Nothing is rolled or recorded unless the whole request is valid.
    ///
    /// # Errors
    ///
    /// Returns the first [`DiceError::InvalidNotation`] encountered.
    pub async fn roll_request(&self, request: &RollRequest) -> Result<ResponsePayload, DiceError> {
        let specs = request
            .dice
            .iter()
            .map(|notation| self.validate(notation).map(|spec| (notation, spec)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut rolls = Vec::with_capacity(specs.len());
        for (notation, spec) in specs {
            let outcomes = self.roll_many(&request.user, notation, spec).await;
            rolls.push(RollResult::new(notation.as_str(), outcomes));
        }

        Ok(ResponsePayload::assemble(request.user.as_str(), rolls))
    }
}
