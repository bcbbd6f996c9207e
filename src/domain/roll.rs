//! Roll request and result types, plus the wire payloads built from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Die sizes offered by the client's dice tray.
pub const DICE_TYPES: [u32; 6] = [4, 6, 8, 10, 12, 20];

/// One of the standard polyhedral dice in [`DICE_TYPES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardDie {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
}

impl StandardDie {
    /// Every standard die, in tray order.
    pub const ALL: [Self; 6] = [Self::D4, Self::D6, Self::D8, Self::D10, Self::D12, Self::D20];

    /// Looks a die up by its tray position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Number of faces.
    #[must_use]
    pub const fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }
}

/// Inbound request: who is rolling and what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RollRequest {
    /// Free-form display name.
    pub user: String,
    /// Notations to roll, in order.
    pub dice: Vec<String>,
}

/// Outcomes of one notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    notation: String,
    outcomes: Vec<u32>,
}

impl RollResult {
    /// Wraps the outcomes rolled for `notation`.
    #[must_use]
    pub fn new(notation: impl Into<String>, outcomes: Vec<u32>) -> Self {
        Self {
            notation: notation.into(),
            outcomes,
        }
    }

    /// Notation exactly as requested.
    #[must_use]
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// Individual outcomes in roll order.
    #[must_use]
    pub fn outcomes(&self) -> &[u32] {
        &self.outcomes
    }

    /// Sum of all outcomes.
    #[must_use]
    pub fn sum(&self) -> u64 {
        self.outcomes.iter().map(|&o| u64::from(o)).sum()
    }
}

/// Outbound broadcast payload.
///
/// A notation that appears several times in one request has all of its
/// outcomes listed under a single key, so `grand_total` is always the sum
/// of every value in `results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponsePayload {
    /// Display name of the roller.
    pub user: String,
    /// Outcomes keyed by notation.
    pub results: BTreeMap<String, Vec<u32>>,
    /// Sum of every outcome in `results`.
    pub grand_total: u64,
}

impl ResponsePayload {
    /// Assembles the payload for `user` from per-notation results.
    #[must_use]
    pub fn assemble(user: impl Into<String>, rolls: Vec<RollResult>) -> Self {
        let mut results: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        let mut grand_total = 0u64;
        for roll in rolls {
            grand_total = grand_total.saturating_add(roll.sum());
            results
                .entry(roll.notation)
                .or_default()
                .extend(roll.outcomes);
        }
        Self {
            user: user.into(),
            results,
            grand_total,
        }
    }
}
