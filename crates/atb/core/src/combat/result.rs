//! Attack outcome and full attack resolution.

use crate::config::CombatTables;
use crate::rng::RandomSource;
use crate::state::Combatant;

use super::damage::{calculate_damage, guarded_damage};
use super::dice::roll;
use super::hit::{attack_roll, check_hit, defense_value, is_critical};

/// Result of one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub hit: bool,
    /// Modified attack roll reached the critical threshold. Evaluated before
    /// the hit test, so it is reported even on a miss.
    pub critical: bool,
    /// Damage rolled for the hit (0 on a miss).
    pub damage: u32,
    /// Hit points the defender actually lost.
    pub dealt: u32,
    /// The defender's guarding stance absorbed part of the damage.
    pub guarded: bool,
    /// This attack took the defender to zero hit points.
    pub defeated: bool,
    /// Natural face of the attack d20.
    pub natural_roll: i32,
    /// Attack d20 plus the attacker's strength modifier.
    pub attack_roll: i32,
    pub defense: i32,
}

/// Resolves `attacker` hitting `defender` and applies the damage.
///
/// 1. `attack = 1d20 + strength modifier`
/// 2. `defense = base_defense + agility modifier`
/// 3. `critical = attack >= critical_threshold`
/// 4. `attack < defense` misses
/// 5. otherwise `damage = damage die + strength modifier + bonus`, scaled on
///    a critical and floored at 1
/// 6. the damage is applied to the defender (halved once if it is guarding)
pub fn resolve_attack(
    attacker: &Combatant,
    defender: &mut Combatant,
    bonus_damage: i32,
    rng: &mut (impl RandomSource + ?Sized),
    tables: &CombatTables,
) -> AttackOutcome {
    let attack = attack_roll(rng, attacker.attributes());
    let attack_total = attack.total();
    let defense = defense_value(defender.attributes(), tables);
    let critical = is_critical(attack_total, tables);

    if !check_hit(attack_total, defense) {
        return AttackOutcome {
            hit: false,
            critical,
            damage: 0,
            dealt: 0,
            guarded: false,
            defeated: false,
            natural_roll: attack.natural(),
            attack_roll: attack_total,
            defense,
        };
    }

    let modifier = attacker
        .attributes()
        .strength_modifier()
        .saturating_add(bonus_damage);
    let rolled = roll(rng, tables.damage_die, 1, modifier).total();
    let damage = calculate_damage(rolled, critical, tables);

    let guarded = defender.is_guarding();
    let incoming = if guarded {
        defender.set_guarding(false);
        guarded_damage(damage)
    } else {
        damage
    };
    let change = defender.take_damage(incoming);

    AttackOutcome {
        hit: true,
        critical,
        damage,
        dealt: change.amount,
        guarded,
        defeated: change.defeated,
        natural_roll: attack.natural(),
        attack_roll: attack_total,
        defense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaugeConfig;
    use crate::rng::{PcgRng, ScriptedDice};
    use crate::state::{Attributes, CombatantId};

    fn fighter(id: u32, strength: i32, agility: i32) -> Combatant {
        Combatant::new(
            CombatantId(id),
            format!("fighter-{id}"),
            Attributes::new(strength, agility, 5),
            &GaugeConfig::default(),
        )
    }

    #[test]
    fn scripted_nine_hits_without_critical() {
        let attacker = fighter(1, 8, 5);
        let mut defender = fighter(2, 5, 6);
        let mut dice = ScriptedDice::new([9, 4]);

        let tables = CombatTables::default();
        let outcome = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert!(outcome.hit);
        assert!(!outcome.critical);
        assert_eq!(outcome.attack_roll, 12);
        assert_eq!(outcome.defense, 11);
        assert_eq!(outcome.damage, 7);
        assert_eq!(defender.vitals().current(), 20 - 7);
    }

    #[test]
    fn huge_bonus_saturates_instead_of_overflowing() {
        let attacker = fighter(1, 8, 5);
        let mut defender = fighter(2, 5, 6);
        let mut dice = ScriptedDice::new([10, 3]);

        let tables = CombatTables::default();
        let outcome = resolve_attack(&attacker, &mut defender, i32::MAX, &mut dice, &tables);
        assert!(outcome.hit);
        assert!(!outcome.critical);
        assert_eq!(outcome.damage, i32::MAX as u32);
        assert_eq!(outcome.dealt, 20);
        assert!(outcome.defeated);
    }

    #[test]
    fn modified_roll_of_twenty_is_critical() {
        // natural 17 + 3 = 20
        let attacker = fighter(1, 8, 5);
        let mut defender = fighter(2, 20, 6);
        let mut dice = ScriptedDice::new([17, 3]);

        let tables = CombatTables::default();
        let outcome = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert_eq!(outcome.natural_roll, 17);
        assert!(outcome.hit);
        assert!(outcome.critical);
        // (3 + 3) * 1.5 = 9
        assert_eq!(outcome.damage, 9);
    }

    #[test]
    fn miss_deals_nothing() {
        let attacker = fighter(1, 5, 5);
        let mut defender = fighter(2, 5, 10);
        let mut dice = ScriptedDice::new([14]);

        let tables = CombatTables::default();
        let outcome = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert!(!outcome.hit);
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.dealt, 0);
        assert_eq!(defender.vitals().current(), defender.vitals().max());
    }

    #[test]
    fn weak_hit_still_deals_one() {
        let attacker = fighter(1, 1, 5);
        let mut defender = fighter(2, 5, 1);
        let mut dice = ScriptedDice::new([10, 1]);

        let tables = CombatTables::default();
        let outcome = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert!(outcome.hit);
        assert_eq!(outcome.damage, 1);
    }

    #[test]
    fn guard_is_consumed_by_the_next_hit() {
        let attacker = fighter(1, 8, 5);
        let mut defender = fighter(2, 5, 5);
        defender.set_guarding(true);
        let mut dice = ScriptedDice::new([15, 4, 15, 4]);
        let tables = CombatTables::default();

        let first = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert!(first.guarded);
        assert_eq!(first.damage, 7);
        assert_eq!(first.dealt, 4);
        assert!(!defender.is_guarding());

        let second = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert!(!second.guarded);
        assert_eq!(second.dealt, 7);
    }

    #[test]
    fn lethal_hit_reports_defeat_once() {
        let attacker = fighter(1, 20, 5);
        let mut defender = fighter(2, 1, 1).with_hp(2);
        let mut dice = ScriptedDice::new([10, 6, 10, 6]);
        let tables = CombatTables::default();

        let first = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert!(first.defeated);
        assert_eq!(first.dealt, 2);

        let second = resolve_attack(&attacker, &mut defender, 0, &mut dice, &tables);
        assert!(!second.defeated);
        assert_eq!(second.dealt, 0);
    }

    #[test]
    fn fixed_seed_reproduces_outcome() {
        let attacker = fighter(1, 9, 5);
        let tables = CombatTables::default();
        let run = |seed| {
            let mut defender = fighter(2, 12, 7);
            let mut rng = PcgRng::seeded(seed);
            resolve_attack(&attacker, &mut defender, 2, &mut rng, &tables)
        };
        for seed in 0..32 {
            assert_eq!(run(seed), run(seed));
        }
    }
}
