//! Dice notation parsing.
//!
//! A notation is `<count>d<sides>`, e.g. `"2d6"` for two six-sided dice.
//! The separator is case-insensitive; both sides must be plain decimal
//! digits. Parsing never rolls anything: a [`DiceSpec`] is only a validated
//! description of what to roll.

use std::fmt;
use std::str::FromStr;

use super::roll::StandardDie;
use crate::error::DiceError;

/// A validated `(count, sides)` pair.
///
/// Invariant: `count >= 1` and `sides >= 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiceSpec {
    count: u32,
    sides: u32,
}

impl DiceSpec {
    /// Builds a spec from raw numbers.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::InvalidNotation`] if `count` is zero or `sides`
    /// is below two.
    pub fn new(count: u32, sides: u32) -> Result<Self, DiceError> {
        let reject = |reason| Err(DiceError::invalid(&format!("{count}d{sides}"), reason));
        if count == 0 {
            return reject("dice count must be at least 1");
        }
        if sides < 2 {
            return reject("a die needs at least 2 sides");
        }
        Ok(Self { count, sides })
    }

    /// Number of dice to roll.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Number of faces on each die.
    #[must_use]
    pub const fn sides(&self) -> u32 {
        self.sides
    }
}

impl From<StandardDie> for DiceSpec {
    fn from(die: StandardDie) -> Self {
        Self {
            count: 1,
            sides: die.sides(),
        }
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

impl FromStr for DiceSpec {
    type Err = DiceError;

    fn from_str(notation: &str) -> Result<Self, Self::Err> {
        parse_notation(notation)
    }
}

/// Parses a notation string such as `"3d6"` or `"1D20"`.
///
/// # Errors
///
/// Returns [`DiceError::InvalidNotation`] when the string is empty, has no
/// separator or more than one, when either side is not a positive decimal
/// integer that fits in `u32`, or when the resulting spec breaks the
/// [`DiceSpec`] invariant.
pub fn parse_notation(notation: &str) -> Result<DiceSpec, DiceError> {
    if notation.is_empty() {
        return Err(DiceError::invalid(notation, "notation is empty"));
    }

    let mut parts = notation.split(['d', 'D']);
    let (Some(count), Some(sides), None) = (parts.next(), parts.next(), parts.next()) else {
        let reason = if notation.contains(['d', 'D']) {
            "more than one 'd' separator"
        } else {
            "missing 'd' separator"
        };
        return Err(DiceError::invalid(notation, reason));
    };

    let count = parse_positive(notation, count, "dice count is not a positive integer")?;
    let sides = parse_positive(notation, sides, "side count is not a positive integer")?;

    if count == 0 {
        return Err(DiceError::invalid(notation, "dice count must be at least 1"));
    }
    if sides < 2 {
        return Err(DiceError::invalid(notation, "a die needs at least 2 sides"));
    }

    Ok(DiceSpec { count, sides })
}

/// `u32::from_str` accepts a leading `+`; notation does not.
fn parse_positive(notation: &str, digits: &str, reason: &'static str) -> Result<u32, DiceError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DiceError::invalid(notation, reason));
    }
    digits
        .parse::<u32>()
        .map_err(|_| DiceError::invalid(notation, reason))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn reason_of(notation: &str) -> &'static str {
        match parse_notation(notation) {
            Err(DiceError::InvalidNotation { reason, .. }) => reason,
            other => panic!("expected rejection of {notation:?}, got {other:?}"),
        }
    }

    #[test]
    fn parses_simple_notation() {
        let Ok(spec) = parse_notation("2d6") else {
            panic!("2d6 should parse");
        };
        assert_eq!(spec.count(), 2);
        assert_eq!(spec.sides(), 6);
    }

    #[test]
    fn separator_is_case_insensitive() {
        assert_eq!(parse_notation("1D20"), DiceSpec::new(1, 20));
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(reason_of(""), "notation is empty");
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(reason_of("26"), "missing 'd' separator");
        assert_eq!(reason_of("2x6"), "missing 'd' separator");
    }

    #[test]
    fn rejects_multiple_separators() {
        assert_eq!(reason_of("2d6d8"), "more than one 'd' separator");
        assert_eq!(reason_of("dd"), "more than one 'd' separator");
    }

    #[test]
    fn rejects_non_numeric_sides() {
        assert_eq!(reason_of("2dx"), "side count is not a positive integer");
        assert_eq!(reason_of("ad6"), "dice count is not a positive integer");
        assert_eq!(reason_of("d6"), "dice count is not a positive integer");
        assert_eq!(reason_of("2d"), "side count is not a positive integer");
    }

    #[test]
    fn rejects_signs_and_whitespace() {
        assert!(parse_notation("-1d6").is_err());
        assert!(parse_notation("+1d6").is_err());
        assert!(parse_notation("2d-6").is_err());
        assert!(parse_notation(" 2d6").is_err());
        assert!(parse_notation("2d6 ").is_err());
    }

    #[test]
    fn rejects_zero_count_and_degenerate_dice() {
        assert_eq!(reason_of("0d6"), "dice count must be at least 1");
        assert_eq!(reason_of("2d0"), "a die needs at least 2 sides");
        assert_eq!(reason_of("2d1"), "a die needs at least 2 sides");
    }

    #[test]
    fn rejects_overflowing_numbers() {
        assert!(parse_notation("99999999999d6").is_err());
        assert!(parse_notation("1d99999999999").is_err());
    }

    #[test]
    fn error_keeps_original_notation() {
        let Err(DiceError::InvalidNotation { notation, .. }) = parse_notation("3q4") else {
            panic!("3q4 should be rejected");
        };
        assert_eq!(notation, "3q4");
    }

    #[test]
    fn display_is_canonical() {
        let Ok(spec) = "4D8".parse::<DiceSpec>() else {
            panic!("4D8 should parse");
        };
        assert_eq!(spec.to_string(), "4d8");
    }

    #[test]
    fn new_enforces_invariant() {
        assert!(DiceSpec::new(0, 6).is_err());
        assert!(DiceSpec::new(1, 1).is_err());
        assert!(DiceSpec::new(1, 2).is_ok());
    }
}
