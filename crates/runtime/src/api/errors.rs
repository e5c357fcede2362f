//! Unified error types surfaced by the runtime API.
//!
//! Wraps scheduler rejections and provider failures so callers can bubble
//! them up with consistent context.

use atb_core::{BattleError, CombatantId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("command provider has no command for combatant {actor}")]
    ProviderExhausted { actor: CombatantId },

    #[error("combatant {actor} had {attempts} commands rejected")]
    CommandRejected {
        actor: CombatantId,
        attempts: u32,
        #[source]
        source: BattleError,
    },

    #[error("battle did not finish within {max_ticks} ticks")]
    TickLimit { max_ticks: u64 },

    #[error("battle ended without producing a summary")]
    NoSummary,
}

impl RuntimeError {
    /// Returns the underlying scheduler error, if any.
    pub fn battle_error(&self) -> Option<&BattleError> {
        match self {
            Self::Battle(error) | Self::CommandRejected { source: error, .. } => Some(error),
            _ => None,
        }
    }
}
