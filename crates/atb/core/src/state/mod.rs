//! Battle state: combatant identity, attributes and the turn state machine.

mod combatant;
mod stats;

pub use combatant::Combatant;
pub use stats::{Attributes, HpChange, Vitals};

use core::fmt;

/// Stable identifier of a combatant within a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the battle a combatant fights for.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Ally,
    Enemy,
    /// Takes turns but has no opponents and does not count towards the end condition.
    #[default]
    Other,
}

impl Side {
    /// Returns true if combatants on `self` attack combatants on `other`.
    pub const fn opposes(self, other: Side) -> bool {
        matches!((self, other), (Side::Ally, Side::Enemy) | (Side::Enemy, Side::Ally))
    }
}

/// Who decides a combatant's actions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Control {
    /// The scheduler suspends in `WaitingForActorInput` until a command arrives.
    Human,
    /// The scheduler picks a target and resolves immediately.
    #[default]
    Ai,
}

/// Turn state machine.
///
/// `Victory` and `Defeat` are transient: teardown moves the scheduler back to
/// `Idle` within the same call that reached them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleState {
    #[default]
    Idle,
    Initializing,
    Running,
    WaitingForActorInput,
    ExecutingAction,
    Victory,
    Defeat,
}

impl BattleState {
    /// Returns true for every state between battle start and teardown.
    pub const fn is_in_battle(self) -> bool {
        !matches!(self, BattleState::Idle)
    }

    /// Returns true for the states that require a current actor.
    pub const fn has_actor(self) -> bool {
        matches!(
            self,
            BattleState::WaitingForActorInput | BattleState::ExecutingAction
        )
    }
}

/// How a battle ended.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

impl BattleOutcome {
    pub const fn is_victory(self) -> bool {
        matches!(self, BattleOutcome::Victory)
    }
}

/// Final record of a battle, produced at teardown.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    /// True if the battle was aborted through `force_end`.
    pub forced: bool,
    /// Number of turns started.
    pub turns_taken: u64,
    /// Battle time advanced, after the speed multiplier.
    pub elapsed: f64,
    /// The roster as it stood when the battle ended.
    pub combatants: Vec<Combatant>,
}

impl BattleSummary {
    pub fn survivors(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }
}
