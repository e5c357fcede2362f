//! Combat resolution system.
//!
//! Pure functions over attributes and a [`RandomSource`](crate::rng::RandomSource).
//! Given the same draws they always produce the same outcome.
//!
//! # Core Functions
//!
//! - `resolve_attack`: full attack resolution (hit test, critical test, damage)
//! - `attack_roll` / `defense_value`: the two sides of the hit test
//! - `calculate_damage`: critical multiplier and minimum damage
//! - dice helpers: `roll`, `check`, `percentage_check`, `roll_damage`

pub mod damage;
pub mod dice;
pub mod hit;
pub mod result;

pub use damage::{calculate_damage, guarded_damage};
pub use dice::{CheckResult, DiceRoll, DiceType, check, percentage_check, roll, roll_damage};
pub use hit::{attack_roll, check_hit, defense_value, is_critical};
pub use result::{AttackOutcome, resolve_attack};
