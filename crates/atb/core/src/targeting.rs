//! AI target selection.
//!
//! The scheduler hands a selector the acting combatant and its living
//! opponents in roster order; the selector names exactly one of them.

use crate::rng::RandomSource;
use crate::state::{Combatant, CombatantId};

/// Picks the target of an AI-controlled attack.
pub trait TargetSelector: Send {
    /// Returns one of `candidates`, or `None` only if `candidates` is empty.
    fn select(
        &mut self,
        actor: &Combatant,
        candidates: &[&Combatant],
        rng: &mut dyn RandomSource,
    ) -> Option<CombatantId>;
}

impl<S: TargetSelector + ?Sized> TargetSelector for Box<S> {
    fn select(
        &mut self,
        actor: &Combatant,
        candidates: &[&Combatant],
        rng: &mut dyn RandomSource,
    ) -> Option<CombatantId> {
        (**self).select(actor, candidates, rng)
    }
}

/// Uniform random choice among living opponents.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTarget;

impl TargetSelector for RandomTarget {
    fn select(
        &mut self,
        _actor: &Combatant,
        candidates: &[&Combatant],
        rng: &mut dyn RandomSource,
    ) -> Option<CombatantId> {
        let last = candidates.len().checked_sub(1)?;
        let index = rng.range(0, last as u32) as usize;
        candidates.get(index).map(|c| c.id())
    }
}

/// Focuses the opponent with the fewest hit points; ties go to roster order.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowestHealthTarget;

impl TargetSelector for LowestHealthTarget {
    fn select(
        &mut self,
        _actor: &Combatant,
        candidates: &[&Combatant],
        _rng: &mut dyn RandomSource,
    ) -> Option<CombatantId> {
        candidates
            .iter()
            .enumerate()
            .min_by_key(|(index, c)| (c.vitals().current(), *index))
            .map(|(_, c)| c.id())
    }
}
