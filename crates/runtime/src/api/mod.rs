//! Public runtime API surface.
//!
//! Types consumers implement or receive when driving a battle: the command
//! provider seam, the read-only battle view handed to it, and the runtime
//! error type.

pub mod errors;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{BattleView, CommandProvider, FirstLivingTarget, ScriptedCommands};
