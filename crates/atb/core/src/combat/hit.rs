//! Attack rolls, defense values and the critical test.

use crate::config::CombatTables;
use crate::rng::RandomSource;
use crate::state::Attributes;

use super::dice::{DiceRoll, DiceType, roll};

/// 1d20 + the attacker's strength modifier.
pub fn attack_roll(rng: &mut (impl RandomSource + ?Sized), attacker: &Attributes) -> DiceRoll {
    roll(rng, DiceType::D20, 1, attacker.strength_modifier())
}

/// Base defense + the defender's agility modifier.
pub fn defense_value(defender: &Attributes, tables: &CombatTables) -> i32 {
    tables.base_defense + defender.agility_modifier()
}

/// Critical when the *modified* attack roll reaches the threshold, whether or
/// not the die itself showed a natural 20.
pub fn is_critical(attack_total: i32, tables: &CombatTables) -> bool {
    attack_total >= tables.critical_threshold
}

/// An attack hits when the modified roll meets or beats the defense value.
pub fn check_hit(attack_total: i32, defense: i32) -> bool {
    attack_total >= defense
}
