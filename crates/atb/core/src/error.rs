//! Error types for battle operations.
//!
//! Every rejected operation leaves the scheduler untouched and reports one of
//! these variants. Each variant belongs to exactly one [`ErrorClass`].

use crate::state::{BattleState, CombatantId, Side};

/// Category of a rejected operation, used for handling strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorClass {
    /// Operation issued in a state that does not accept it.
    ///
    /// Examples: command while not waiting for input, starting a second battle
    Protocol,

    /// Command names a target that cannot be attacked.
    ///
    /// Examples: dead target, index out of range, ally as target
    InvalidTarget,

    /// Malformed arguments.
    ///
    /// Examples: negative time step, empty side, duplicate combatant ids
    InvalidInput,
}

impl ErrorClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::InvalidTarget => "invalid_target",
            Self::InvalidInput => "invalid_input",
        }
    }
}

/// Errors surfaced by [`TurnScheduler`](crate::engine::TurnScheduler) operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleError {
    #[error("a battle is already in progress (state: {state})")]
    BattleAlreadyActive { state: BattleState },

    #[error("no battle in progress")]
    NotInBattle,

    #[error("commands are only accepted while waiting for input (state: {state})")]
    NotAwaitingInput { state: BattleState },

    #[error("no action is waiting for completion (state: {state})")]
    NoPendingAction { state: BattleState },

    #[error("target index {index} is out of range ({len} opponents)")]
    TargetOutOfRange { index: usize, len: usize },

    #[error("combatant {0} is not part of this battle")]
    CombatantNotFound(CombatantId),

    #[error("combatant {0} is not an opponent of the current actor")]
    NotAnOpponent(CombatantId),

    #[error("combatant {0} has already been defeated")]
    TargetDefeated(CombatantId),

    #[error("a battle needs at least one {0} combatant")]
    EmptySide(Side),

    #[error("combatant {0} appears more than once in the roster")]
    DuplicateCombatant(CombatantId),

    #[error("time step must be finite and non-negative (got {0})")]
    InvalidTimeStep(f64),
}

impl BattleError {
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::BattleAlreadyActive { .. }
            | Self::NotInBattle
            | Self::NotAwaitingInput { .. }
            | Self::NoPendingAction { .. } => ErrorClass::Protocol,
            Self::TargetOutOfRange { .. }
            | Self::CombatantNotFound(_)
            | Self::NotAnOpponent(_)
            | Self::TargetDefeated(_) => ErrorClass::InvalidTarget,
            Self::EmptySide(_) | Self::DuplicateCombatant(_) | Self::InvalidTimeStep(_) => {
                ErrorClass::InvalidInput
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_taxonomy() {
        let protocol = BattleError::NotAwaitingInput {
            state: BattleState::Running,
        };
        assert_eq!(protocol.class(), ErrorClass::Protocol);
        assert_eq!(
            BattleError::TargetDefeated(CombatantId(3)).class(),
            ErrorClass::InvalidTarget
        );
        assert_eq!(BattleError::InvalidTimeStep(-1.0).class(), ErrorClass::InvalidInput);
    }

    #[test]
    fn messages_name_the_state() {
        let error = BattleError::NotAwaitingInput {
            state: BattleState::Running,
        };
        assert_eq!(
            error.to_string(),
            "commands are only accepted while waiting for input (state: running)"
        );
    }
}
