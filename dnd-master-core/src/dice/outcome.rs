//! Roll outcomes and their transcript rendering.

use super::{Advantage, DiceError, DiceSpec};
use std::fmt;
use tracing::warn;

/// Bonuses layered on top of a base roll by the composite operations.
///
/// Each one is already folded into the roll total; they are kept separately
/// for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollBonuses {
    pub ability_modifier: Option<i32>,
    pub attack_bonus: Option<i32>,
    pub damage_bonus: Option<i32>,
    pub dex_modifier: Option<i32>,
}

/// Which composite bonus is being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BonusKind {
    Ability,
    Attack,
    Damage,
    Dexterity,
}

impl RollBonuses {
    fn set(&mut self, kind: BonusKind, value: i32) {
        let slot = match kind {
            BonusKind::Ability => &mut self.ability_modifier,
            BonusKind::Attack => &mut self.attack_bonus,
            BonusKind::Damage => &mut self.damage_bonus,
            BonusKind::Dexterity => &mut self.dex_modifier,
        };
        *slot = Some(value);
    }
}

/// A successfully executed roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// The notation exactly as it was requested.
    pub notation: String,
    pub spec: DiceSpec,
    /// Individual die faces, in roll order.
    pub rolls: Vec<u32>,
    /// Sum of the faces plus the notation modifier and any bonuses.
    pub total: i32,
    pub is_critical: bool,
    pub is_fumble: bool,
    pub advantage: Advantage,
    pub bonuses: RollBonuses,
}

impl DiceRoll {
    /// Build a roll from faces already produced for `spec`.
    pub fn from_faces(notation: impl Into<String>, spec: DiceSpec, rolls: Vec<u32>) -> Self {
        let is_d20 = spec.sides() == 20;
        let dice_total = rolls
            .iter()
            .fold(0i32, |sum, &r| sum.saturating_add(i32::try_from(r).unwrap_or(i32::MAX)));

        Self {
            notation: notation.into(),
            spec,
            is_critical: is_d20 && rolls.contains(&20),
            is_fumble: is_d20 && rolls.contains(&1),
            total: dice_total.saturating_add(spec.modifier),
            rolls,
            advantage: Advantage::Normal,
            bonuses: RollBonuses::default(),
        }
    }

    /// Total before any composite bonus was added.
    pub fn base_total(&self) -> i32 {
        self.total
            - [
                self.bonuses.ability_modifier,
                self.bonuses.attack_bonus,
                self.bonuses.damage_bonus,
                self.bonuses.dex_modifier,
            ]
            .into_iter()
            .flatten()
            .sum::<i32>()
    }
}

/// A notation that could not be rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollFailure {
    pub notation: String,
    pub error: DiceError,
    pub bonuses: RollBonuses,
}

/// Result of any roll operation. Failures carry a total of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    Rolled(DiceRoll),
    Failed(RollFailure),
}

impl RollOutcome {
    pub(crate) fn failed(notation: impl Into<String>, error: DiceError) -> Self {
        RollOutcome::Failed(RollFailure {
            notation: notation.into(),
            error,
            bonuses: RollBonuses::default(),
        })
    }

    /// Record a composite bonus. Successful rolls also add it to the total;
    /// a total that would leave the `i32` range turns the roll into a failure.
    pub(crate) fn with_bonus(self, kind: BonusKind, value: i32) -> Self {
        match self {
            RollOutcome::Rolled(mut roll) => {
                roll.bonuses.set(kind, value);
                match roll.total.checked_add(value) {
                    Some(total) => {
                        roll.total = total;
                        RollOutcome::Rolled(roll)
                    }
                    None => {
                        warn!(notation = %roll.notation, bonus = value, "roll total out of range");
                        RollOutcome::Failed(RollFailure {
                            notation: roll.notation,
                            error: DiceError::ModifierOutOfRange(format!("{value:+}")),
                            bonuses: roll.bonuses,
                        })
                    }
                }
            }
            RollOutcome::Failed(mut failure) => {
                failure.bonuses.set(kind, value);
                RollOutcome::Failed(failure)
            }
        }
    }

    pub fn total(&self) -> i32 {
        match self {
            RollOutcome::Rolled(roll) => roll.total,
            RollOutcome::Failed(_) => 0,
        }
    }

    pub fn notation(&self) -> &str {
        match self {
            RollOutcome::Rolled(roll) => &roll.notation,
            RollOutcome::Failed(failure) => &failure.notation,
        }
    }

    /// Individual die faces; empty for a failed roll.
    pub fn rolls(&self) -> &[u32] {
        match self {
            RollOutcome::Rolled(roll) => &roll.rolls,
            RollOutcome::Failed(_) => &[],
        }
    }

    pub fn bonuses(&self) -> &RollBonuses {
        match self {
            RollOutcome::Rolled(roll) => &roll.bonuses,
            RollOutcome::Failed(failure) => &failure.bonuses,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, RollOutcome::Rolled(roll) if roll.is_critical)
    }

    pub fn is_fumble(&self) -> bool {
        matches!(self, RollOutcome::Rolled(roll) if roll.is_fumble)
    }

    pub fn advantage(&self) -> Advantage {
        match self {
            RollOutcome::Rolled(roll) => roll.advantage,
            RollOutcome::Failed(_) => Advantage::Normal,
        }
    }

    pub fn error(&self) -> Option<&DiceError> {
        match self {
            RollOutcome::Rolled(_) => None,
            RollOutcome::Failed(failure) => Some(&failure.error),
        }
    }

    pub fn as_roll(&self) -> Option<&DiceRoll> {
        match self {
            RollOutcome::Rolled(roll) => Some(roll),
            RollOutcome::Failed(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RollOutcome::Failed(_))
    }
}

/// Renders the single transcript line for a roll.
impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roll = match self {
            RollOutcome::Rolled(roll) => roll,
            RollOutcome::Failed(failure) => {
                return write!(f, "❌ Ошибка броска: {}", failure.error);
            }
        };

        let faces = roll
            .rolls
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let mut details = vec![format!("Бросок: [{faces}]")];

        if roll.spec.modifier != 0 {
            details.push(format!("Модификатор: {:+}", roll.spec.modifier));
        }
        if let Some(value) = roll.bonuses.ability_modifier.filter(|v| *v != 0) {
            details.push(format!("Характеристика: {value:+}"));
        }
        if let Some(value) = roll.bonuses.attack_bonus.filter(|v| *v != 0) {
            details.push(format!("Бонус атаки: {value:+}"));
        }

        if roll.is_critical {
            details.push("🎯 КРИТИЧЕСКИЙ УДАР!".to_string());
        } else if roll.is_fumble {
            details.push("💥 КРИТИЧЕСКИЙ ПРОМАХ!".to_string());
        }

        match roll.advantage {
            Advantage::Advantage => details.push("✨ Преимущество".to_string()),
            Advantage::Disadvantage => details.push("⚠️ Недостаток".to_string()),
            Advantage::Normal => {}
        }

        write!(
            f,
            "🎲 {} = {} ({})",
            roll.notation,
            roll.total,
            details.join(" | ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll(notation: &str, faces: &[u32]) -> DiceRoll {
        let spec = DiceSpec::parse(notation).unwrap();
        DiceRoll::from_faces(notation, spec, faces.to_vec())
    }

    #[test]
    fn test_total_includes_modifier() {
        let r = roll("2d6+3", &[4, 5]);
        assert_eq!(r.total, 12);
        assert!(!r.is_critical);
        assert!(!r.is_fumble);
    }

    #[test]
    fn test_critical_on_any_d20() {
        let r = roll("2d20", &[3, 20]);
        assert!(r.is_critical);
        assert!(!r.is_fumble);

        let r = roll("2d20", &[1, 20]);
        assert!(r.is_critical);
        assert!(r.is_fumble);
    }

    #[test]
    fn test_no_critical_off_d20() {
        let r = roll("d100", &[20]);
        assert!(!r.is_critical);
        let r = roll("d4", &[1]);
        assert!(!r.is_fumble);
    }

    #[test]
    fn test_failed_total_is_zero() {
        let outcome = RollOutcome::failed("d7", DiceError::UnsupportedDie("7".to_string()))
            .with_bonus(BonusKind::Attack, 5);
        assert_eq!(outcome.total(), 0);
        assert!(outcome.rolls().is_empty());
        assert_eq!(outcome.bonuses().attack_bonus, Some(5));
        assert!(!outcome.is_critical());
    }

    #[test]
    fn test_base_total_strips_bonuses() {
        let outcome = RollOutcome::Rolled(roll("d20", &[11]))
            .with_bonus(BonusKind::Ability, 3)
            .with_bonus(BonusKind::Attack, 2);
        assert_eq!(outcome.total(), 16);
        assert_eq!(outcome.as_roll().unwrap().base_total(), 11);
    }

    #[test]
    fn test_format_plain() {
        let outcome = RollOutcome::Rolled(roll("2d6+3", &[4, 5]));
        assert_eq!(
            outcome.to_string(),
            "🎲 2d6+3 = 12 (Бросок: [4, 5] | Модификатор: +3)"
        );
    }

    #[test]
    fn test_format_negative_modifier() {
        let outcome = RollOutcome::Rolled(roll("d20-1", &[10]));
        assert_eq!(
            outcome.to_string(),
            "🎲 d20-1 = 9 (Бросок: [10] | Модификатор: -1)"
        );
    }

    #[test]
    fn test_format_section_order() {
        let mut r = roll("d20", &[20]);
        r.advantage = Advantage::Advantage;
        let outcome = RollOutcome::Rolled(r)
            .with_bonus(BonusKind::Ability, 2)
            .with_bonus(BonusKind::Attack, -1);
        assert_eq!(
            outcome.to_string(),
            "🎲 d20 = 21 (Бросок: [20] | Характеристика: +2 | Бонус атаки: -1 | 🎯 КРИТИЧЕСКИЙ УДАР! | ✨ Преимущество)"
        );
    }

    #[test]
    fn test_format_critical_hides_fumble() {
        let outcome = RollOutcome::Rolled(roll("2d20", &[1, 20]));
        let line = outcome.to_string();
        assert!(line.contains("КРИТИЧЕСКИЙ УДАР"));
        assert!(!line.contains("КРИТИЧЕСКИЙ ПРОМАХ"));
    }

    #[test]
    fn test_format_suppresses_zero_bonuses() {
        let mut r = roll("d20", &[1]);
        r.advantage = Advantage::Disadvantage;
        let outcome = RollOutcome::Rolled(r)
            .with_bonus(BonusKind::Ability, 0)
            .with_bonus(BonusKind::Damage, 4);
        assert_eq!(
            outcome.to_string(),
            "🎲 d20 = 5 (Бросок: [1] | 💥 КРИТИЧЕСКИЙ ПРОМАХ! | ⚠️ Недостаток)"
        );
    }

    #[test]
    fn test_format_failure() {
        let outcome = RollOutcome::failed("d7", DiceError::UnsupportedDie("7".to_string()));
        assert_eq!(
            outcome.to_string(),
            "❌ Ошибка броска: Неподдерживаемый тип кости: d7"
        );
    }
}
