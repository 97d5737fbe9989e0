//! Executing dice specs against a source of randomness.

use super::outcome::BonusKind;
use super::{Advantage, DiceRoll, DiceSpec, RollOutcome};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Produces individual die faces.
pub trait DieSource {
    /// Roll one die, returning a face in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<S: DieSource + ?Sized> DieSource for &mut S {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }
}

/// Uniform dice backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R = ThreadRng> {
    rng: R,
}

impl RandomDice<ThreadRng> {
    /// Dice backed by the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandomDice<StdRng> {
    /// Reproducible dice for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomDice<ThreadRng> {
    fn default() -> Self {
        Self::thread()
    }
}

impl<R: Rng> DieSource for RandomDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides)
    }
}

/// Rolls notation and the composite d20 mechanics.
///
/// Holds no state besides its die source, so each call site owns one.
/// Every operation returns a [`RollOutcome`]; nothing here fails.
#[derive(Debug, Clone, Default)]
pub struct DiceRoller<S = RandomDice> {
    source: S,
}

impl DiceRoller<RandomDice> {
    /// A roller using the thread-local generator.
    pub fn new() -> Self {
        Self::with_source(RandomDice::thread())
    }
}

impl DiceRoller<RandomDice<StdRng>> {
    /// A roller whose results are reproducible for `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_source(RandomDice::seeded(seed))
    }
}

impl<S: DieSource> DiceRoller<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Parse and roll a notation string such as `2d6+3`.
    pub fn roll(&mut self, notation: &str) -> RollOutcome {
        match DiceSpec::parse(notation) {
            Ok(spec) => RollOutcome::Rolled(self.roll_spec(notation, &spec)),
            Err(error) => {
                warn!(notation, %error, "dice notation rejected");
                RollOutcome::failed(notation, error)
            }
        }
    }

    /// Roll an already parsed spec.
    pub fn roll_spec(&mut self, notation: &str, spec: &DiceSpec) -> DiceRoll {
        let rolls: Vec<u32> = (0..spec.count)
            .map(|_| self.source.roll_die(spec.sides()))
            .collect();
        let roll = DiceRoll::from_faces(notation, *spec, rolls);
        debug!(
            notation,
            rolls = ?roll.rolls,
            total = roll.total,
            critical = roll.is_critical,
            fumble = roll.is_fumble,
            "dice rolled"
        );
        roll
    }

    /// Ability check on a d20.
    ///
    /// With advantage or disadvantage two d20s are rolled and the higher or
    /// lower is kept. The pick compares the bare rolls; `modifier` is added
    /// to the kept one afterwards.
    pub fn ability_check(&mut self, modifier: i32, advantage: Advantage) -> RollOutcome {
        let kept = match advantage {
            Advantage::Normal => self.d20(),
            Advantage::Advantage | Advantage::Disadvantage => {
                let first = self.d20();
                let second = self.d20();
                let keep_first = match advantage {
                    Advantage::Advantage => first.total > second.total,
                    _ => first.total < second.total,
                };
                let mut kept = if keep_first { first } else { second };
                kept.advantage = advantage;
                kept
            }
        };

        RollOutcome::Rolled(kept).with_bonus(BonusKind::Ability, modifier)
    }

    /// Ability check from the two request flags; both together cancel out.
    pub fn ability_check_flags(
        &mut self,
        modifier: i32,
        advantage: bool,
        disadvantage: bool,
    ) -> RollOutcome {
        self.ability_check(modifier, Advantage::from_flags(advantage, disadvantage))
    }

    /// Attack roll: a d20 plus the attack bonus.
    pub fn attack(&mut self, attack_bonus: i32) -> RollOutcome {
        RollOutcome::Rolled(self.d20()).with_bonus(BonusKind::Attack, attack_bonus)
    }

    /// Damage roll for the weapon's notation plus a flat bonus.
    pub fn damage(&mut self, notation: &str, damage_bonus: i32) -> RollOutcome {
        self.roll(notation)
            .with_bonus(BonusKind::Damage, damage_bonus)
    }

    /// Initiative: a d20 plus the dexterity modifier.
    pub fn initiative(&mut self, dex_modifier: i32) -> RollOutcome {
        RollOutcome::Rolled(self.d20()).with_bonus(BonusKind::Dexterity, dex_modifier)
    }

    fn d20(&mut self) -> DiceRoll {
        self.roll_spec("d20", &DiceSpec::D20)
    }
}
