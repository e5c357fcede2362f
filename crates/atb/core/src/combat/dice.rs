//! Dice rolls and checks.
//!
//! Two critical conventions coexist on purpose: [`check`] and
//! [`DiceRoll::is_critical_success`] use the natural face of a single d20,
//! while attack resolution compares the *modified* roll against the
//! critical threshold (see [`super::hit::is_critical`]).

use core::fmt;

use crate::rng::RandomSource;

/// Die sizes used by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum DiceType {
    D6,
    D20,
    D100,
}

impl DiceType {
    pub const fn sides(self) -> u32 {
        match self {
            DiceType::D6 => 6,
            DiceType::D20 => 20,
            DiceType::D100 => 100,
        }
    }
}

/// Faces rolled plus a flat modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceRoll {
    pub dice: DiceType,
    pub rolls: Vec<u32>,
    pub modifier: i32,
}

impl DiceRoll {
    /// Sum of the faces, without the modifier.
    pub fn natural(&self) -> i32 {
        self.rolls.iter().map(|&face| face as i32).sum()
    }

    /// Sum of the faces plus the modifier.
    pub fn total(&self) -> i32 {
        self.natural().saturating_add(self.modifier)
    }

    /// A single d20 showing 20.
    pub fn is_critical_success(&self) -> bool {
        self.dice == DiceType::D20 && self.rolls.as_slice() == [20]
    }

    /// A single d20 showing 1.
    pub fn is_critical_failure(&self) -> bool {
        self.dice == DiceType::D20 && self.rolls.as_slice() == [1]
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = self
            .rolls
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("+");
        write!(f, "{}{}({})", self.rolls.len(), self.dice, faces)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        write!(f, " = {}", self.total())
    }
}

/// Rolls `count` dice of the given type and adds `modifier`.
pub fn roll(
    rng: &mut (impl RandomSource + ?Sized),
    dice: DiceType,
    count: u32,
    modifier: i32,
) -> DiceRoll {
    let rolls = (0..count).map(|_| rng.roll_die(dice.sides())).collect();
    DiceRoll {
        dice,
        rolls,
        modifier,
    }
}

/// Outcome of a d20 check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub success: bool,
    pub roll: DiceRoll,
}

/// d20 + `modifier` against a difficulty class.
///
/// A natural 20 always succeeds and a natural 1 always fails.
pub fn check(
    rng: &mut (impl RandomSource + ?Sized),
    modifier: i32,
    difficulty: i32,
) -> CheckResult {
    let roll = roll(rng, DiceType::D20, 1, modifier);
    let success = if roll.is_critical_success() {
        true
    } else if roll.is_critical_failure() {
        false
    } else {
        roll.total() >= difficulty
    };
    CheckResult { success, roll }
}

/// d100 at or under `success_rate` (1-100).
pub fn percentage_check(rng: &mut (impl RandomSource + ?Sized), success_rate: i32) -> CheckResult {
    let roll = roll(rng, DiceType::D100, 1, 0);
    CheckResult {
        success: roll.total() <= success_rate,
        roll,
    }
}

/// `count`d6 + `modifier`.
pub fn roll_damage(rng: &mut (impl RandomSource + ?Sized), count: u32, modifier: i32) -> i32 {
    roll(rng, DiceType::D6, count, modifier).total()
}
