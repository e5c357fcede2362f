//! Asynchronous abstraction for sourcing human decisions.
//!
//! The scheduler suspends in `WaitingForActorInput` whenever a
//! human-controlled combatant's turn starts. Runtime users plug in
//! [`CommandProvider`] implementations so that decision can come from a UI,
//! scripted fixtures, or a simple policy.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use atb_core::{BattleState, Combatant, CombatantId, Command, Target, TurnScheduler};

use super::errors::{Result, RuntimeError};

/// Read-only snapshot of a battle handed to providers.
#[derive(Clone, Debug)]
pub struct BattleView {
    pub state: BattleState,
    pub actor: CombatantId,
    pub elapsed: f64,
    /// The whole roster in scan order.
    pub combatants: Vec<Combatant>,
}

impl BattleView {
    /// Captures the scheduler's roster for `actor`.
    pub fn capture(scheduler: &TurnScheduler, actor: CombatantId) -> Self {
        Self {
            state: scheduler.state(),
            actor,
            elapsed: scheduler.elapsed(),
            combatants: scheduler.combatants().to_vec(),
        }
    }

    pub fn actor(&self) -> Option<&Combatant> {
        self.combatant(self.actor)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id() == id)
    }

    /// The actor's opponents, living or not, in the order [`Target::Index`]
    /// refers to.
    pub fn opponents(&self) -> impl Iterator<Item = &Combatant> {
        let side = self.actor().map(Combatant::side);
        self.combatants
            .iter()
            .filter(move |c| side.is_some_and(|side| side.opposes(c.side())))
    }

    pub fn living_opponents(&self) -> impl Iterator<Item = &Combatant> {
        self.opponents().filter(|c| c.is_alive())
    }
}

/// Trait for providing commands to human-controlled combatants.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed commands
/// - Testing fixtures
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Provide a command for `actor`, whose input the scheduler is awaiting.
    async fn provide_command(&self, actor: CombatantId, view: &BattleView) -> Result<Command>;
}

/// Replays a fixed list of commands in order.
#[derive(Debug, Default)]
pub struct ScriptedCommands {
    commands: Mutex<VecDeque<Command>>,
}

impl ScriptedCommands {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl CommandProvider for ScriptedCommands {
    async fn provide_command(&self, actor: CombatantId, _view: &BattleView) -> Result<Command> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or(RuntimeError::ProviderExhausted { actor })
    }
}

/// Attacks the first living opponent in roster order, or defends if there
/// is none.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLivingTarget;

#[async_trait]
impl CommandProvider for FirstLivingTarget {
    async fn provide_command(&self, _actor: CombatantId, view: &BattleView) -> Result<Command> {
        let command = match view.living_opponents().next() {
            Some(target) => Command::Attack(Target::Id(target.id())),
            None => Command::Defend,
        };
        Ok(command)
    }
}
