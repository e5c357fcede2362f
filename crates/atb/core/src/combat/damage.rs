//! Damage calculation.

use crate::config::CombatTables;

/// Final damage of a successful hit.
///
/// # Formula
///
/// ```text
/// damage = rolled                                  (damage die + modifiers)
/// if critical:
///     damage = round_half_even(damage * critical_multiplier)
/// damage = max(1, damage)
/// ```
pub fn calculate_damage(rolled: i32, critical: bool, tables: &CombatTables) -> u32 {
    let mut damage = rolled;
    if critical {
        damage = (f64::from(damage) * tables.critical_multiplier).round_ties_even() as i32;
    }
    damage.max(1) as u32
}

/// Hit point loss for a defender in a guarding stance: half, rounded up.
pub fn guarded_damage(damage: u32) -> u32 {
    damage.div_ceil(2).max(1)
}
