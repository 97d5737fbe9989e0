//! Dice rolling for the tabletop session.
//!
//! Supports the notation `[N]dS[+M|-M]` over the standard polyhedral dice,
//! d20 advantage/disadvantage, attack, damage and initiative rolls.
//! Rolling never fails: a bad notation comes back as [`RollOutcome::Failed`]
//! so a transcript can keep going past it.

pub mod outcome;
pub mod roller;

pub use outcome::{DiceRoll, RollBonuses, RollFailure, RollOutcome};
pub use roller::{DiceRoller, DieSource, RandomDice};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of dice a single notation may ask for.
pub const MAX_DICE_COUNT: u32 = 100;

/// Error type for dice notation parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Неверный формат броска: {0}")]
    InvalidNotation(String),
    #[error("Неподдерживаемый тип кости: d{0}")]
    UnsupportedDie(String),
    #[error("Неверный формат модификатора: {0}")]
    InvalidModifier(String),
    #[error("Нужно бросить хотя бы одну кость: {0}")]
    NoDice(String),
    #[error("Слишком много костей: {0} (максимум {max})", max = MAX_DICE_COUNT)]
    TooManyDice(String),
    #[error("Модификатор вне допустимого диапазона: {0}")]
    ModifierOutOfRange(String),
}

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Build from the two request flags. Asking for both cancels out.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Advantage {
        match (advantage, disadvantage) {
            (true, false) => Advantage::Advantage,
            (false, true) => Advantage::Disadvantage,
            _ => Advantage::Normal,
        }
    }
}

/// Supported die types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A parsed dice notation such as `2d6+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSpec {
    pub count: u32,
    pub die: DieType,
    pub modifier: i32,
}

impl DiceSpec {
    /// A single plain d20.
    pub const D20: DiceSpec = DiceSpec {
        count: 1,
        die: DieType::D20,
        modifier: 0,
    };

    pub fn sides(&self) -> u32 {
        self.die.sides()
    }

    /// Parse a dice notation string.
    ///
    /// Whitespace anywhere in the input is ignored and the count may be
    /// omitted (`d20` is one die). The die marker is case-insensitive.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let compact: String = notation.chars().filter(|c| !c.is_whitespace()).collect();
        let is_marker = |c: char| c == 'd' || c == 'D';

        let (count, rest) = match compact.strip_prefix(is_marker) {
            Some(rest) => (1, rest),
            None => {
                let (digits, after) = split_digits(&compact);
                if digits.is_empty() {
                    return Err(DiceError::InvalidNotation(compact.clone()));
                }
                let rest = after
                    .strip_prefix(is_marker)
                    .ok_or_else(|| DiceError::InvalidNotation(compact.clone()))?;
                let count: u32 = digits
                    .parse()
                    .map_err(|_| DiceError::TooManyDice(digits.to_string()))?;
                (count, rest)
            }
        };

        let (sides_str, remaining) = split_digits(rest);
        if sides_str.is_empty() {
            return Err(DiceError::InvalidNotation(compact.clone()));
        }
        let die = sides_str
            .parse()
            .ok()
            .and_then(DieType::from_sides)
            .ok_or_else(|| DiceError::UnsupportedDie(sides_str.to_string()))?;

        let modifier = parse_modifier(remaining)?;

        if count == 0 {
            return Err(DiceError::NoDice(compact));
        }
        if count > MAX_DICE_COUNT {
            return Err(DiceError::TooManyDice(count.to_string()));
        }

        // The highest possible total must still fit in an i32.
        let highest = i64::from(count) * i64::from(die.sides()) + i64::from(modifier);
        if i32::try_from(highest).is_err() {
            return Err(DiceError::ModifierOutOfRange(remaining.to_string()));
        }

        Ok(DiceSpec {
            count,
            die,
            modifier,
        })
    }
}

impl FromStr for DiceSpec {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceSpec::parse(s)
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.die)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

/// Split a string into its leading ASCII digits and the remainder.
fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn parse_modifier(remaining: &str) -> Result<i32, DiceError> {
    if remaining.is_empty() {
        return Ok(0);
    }

    let invalid = || DiceError::InvalidModifier(remaining.to_string());
    if let Some(value) = remaining.strip_prefix('+') {
        value.parse::<i32>().map_err(|_| invalid())
    } else if let Some(value) = remaining.strip_prefix('-') {
        value
            .parse::<i32>()
            .ok()
            .and_then(i32::checked_neg)
            .ok_or_else(invalid)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let spec = DiceSpec::parse("1d20").unwrap();
        assert_eq!(spec.count, 1);
        assert_eq!(spec.die, DieType::D20);
        assert_eq!(spec.modifier, 0);
    }

    #[test]
    fn test_parse_shorthand() {
        let spec = DiceSpec::parse("d20").unwrap();
        assert_eq!(spec, DiceSpec::D20);

        let spec = DiceSpec::parse("D8").unwrap();
        assert_eq!(spec.die, DieType::D8);
    }

    #[test]
    fn test_parse_with_modifier() {
        let spec = DiceSpec::parse("2d6+3").unwrap();
        assert_eq!(spec.count, 2);
        assert_eq!(spec.modifier, 3);

        let spec = DiceSpec::parse("d20-1").unwrap();
        assert_eq!(spec.modifier, -1);
    }

    #[test]
    fn test_parse_strips_whitespace() {
        let spec = DiceSpec::parse(" 2 d 6 + 3 ").unwrap();
        assert_eq!(spec.count, 2);
        assert_eq!(spec.die, DieType::D6);
        assert_eq!(spec.modifier, 3);
    }

    #[test]
    fn test_unsupported_die() {
        assert_eq!(
            DiceSpec::parse("1d7"),
            Err(DiceError::UnsupportedDie("7".to_string()))
        );
        assert!(matches!(
            DiceSpec::parse("d3+2"),
            Err(DiceError::UnsupportedDie(_))
        ));
    }

    #[test]
    fn test_invalid_notation() {
        assert!(matches!(
            DiceSpec::parse("abc"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert!(matches!(
            DiceSpec::parse("2x6"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert!(matches!(
            DiceSpec::parse("d"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert!(matches!(
            DiceSpec::parse(""),
            Err(DiceError::InvalidNotation(_))
        ));
    }

    #[test]
    fn test_invalid_modifier() {
        assert_eq!(
            DiceSpec::parse("d20*2"),
            Err(DiceError::InvalidModifier("*2".to_string()))
        );
        assert!(matches!(
            DiceSpec::parse("d20+"),
            Err(DiceError::InvalidModifier(_))
        ));
        assert!(matches!(
            DiceSpec::parse("1d6+1d4"),
            Err(DiceError::InvalidModifier(_))
        ));
    }

    #[test]
    fn test_dice_count_bounds() {
        assert!(matches!(DiceSpec::parse("0d6"), Err(DiceError::NoDice(_))));
        assert!(DiceSpec::parse("100d6").is_ok());
        assert_eq!(
            DiceSpec::parse("101d6"),
            Err(DiceError::TooManyDice("101".to_string()))
        );
        assert!(matches!(
            DiceSpec::parse("9999999999999d6"),
            Err(DiceError::TooManyDice(_))
        ));
    }

    #[test]
    fn test_modifier_must_fit_total() {
        assert_eq!(
            DiceSpec::parse("d20+2147483647"),
            Err(DiceError::ModifierOutOfRange("+2147483647".to_string()))
        );
        assert!(DiceSpec::parse("d20+2147483627").is_ok());
        assert!(matches!(
            DiceSpec::parse("100d100+2147473648"),
            Err(DiceError::ModifierOutOfRange(_))
        ));
        assert!(DiceSpec::parse("d20-2147483647").is_ok());
    }

    #[test]
    fn test_error_messages_name_fragment() {
        let err = DiceSpec::parse("d7").unwrap_err();
        assert_eq!(err.to_string(), "Неподдерживаемый тип кости: d7");

        let err = DiceSpec::parse("d6x").unwrap_err();
        assert_eq!(err.to_string(), "Неверный формат модификатора: x");
    }

    #[test]
    fn test_spec_display() {
        assert_eq!(DiceSpec::parse("d20").unwrap().to_string(), "1d20");
        assert_eq!(DiceSpec::parse("2d6+3").unwrap().to_string(), "2d6+3");
        assert_eq!(DiceSpec::parse("3d8-2").unwrap().to_string(), "3d8-2");
    }

    #[test]
    fn test_advantage_from_flags() {
        assert_eq!(Advantage::from_flags(true, false), Advantage::Advantage);
        assert_eq!(Advantage::from_flags(false, true), Advantage::Disadvantage);
        assert_eq!(Advantage::from_flags(true, true), Advantage::Normal);
        assert_eq!(Advantage::from_flags(false, false), Advantage::Normal);
    }
}
