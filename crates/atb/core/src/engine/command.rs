use crate::error::BattleError;
use crate::event::BattleEvent;
use crate::state::{BattleState, CombatantId};

use super::TurnScheduler;

/// Names the target of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// Position among the actor's opponents in roster order, counting the
    /// defeated (see [`TurnScheduler::opponents_of`]).
    Index(usize),
    Id(CombatantId),
}

impl From<usize> for Target {
    fn from(index: usize) -> Self {
        Target::Index(index)
    }
}

impl From<CombatantId> for Target {
    fn from(id: CombatantId) -> Self {
        Target::Id(id)
    }
}

/// Decision supplied for a human-controlled actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Attack(Target),
    /// Halve the next hit taken before the actor's next turn.
    Defend,
}

/// External commands and stat changes.
impl TurnScheduler {
    /// Commits the current actor's decision.
    ///
    /// Only valid in `WaitingForActorInput`. A rejected command leaves the
    /// scheduler untouched and the actor still waiting.
    pub fn submit_command(&mut self, command: Command) -> Result<(), BattleError> {
        let actor = self
            .awaiting_actor()
            .inspect_err(|error| tracing::warn!(?command, %error, "command rejected"))?;

        match command {
            Command::Attack(target) => {
                let target = self
                    .resolve_target(actor, target)
                    .inspect_err(|error| tracing::warn!(?command, %error, "command rejected"))?;
                self.set_state(BattleState::ExecutingAction);
                self.perform_attack(actor, target);
            }
            Command::Defend => {
                self.set_state(BattleState::ExecutingAction);
                self.perform_defend(actor);
            }
        }

        self.commit_pacing();
        self.dispatch();
        Ok(())
    }

    pub fn submit_attack(&mut self, target: impl Into<Target>) -> Result<(), BattleError> {
        self.submit_command(Command::Attack(target.into()))
    }

    pub fn submit_defend(&mut self) -> Result<(), BattleError> {
        self.submit_command(Command::Defend)
    }

    /// Closes an action deferred by `Delay` or `External` pacing.
    pub fn complete_action(&mut self) -> Result<(), BattleError> {
        if self.state != BattleState::ExecutingAction || self.pending.is_none() {
            return Err(BattleError::NoPendingAction { state: self.state });
        }
        self.finish_turn();
        self.dispatch();
        Ok(())
    }

    /// Applies damage from outside the turn flow. Returns the hit points lost.
    ///
    /// A human actor killed while its input is pending forfeits the turn.
    pub fn apply_damage(&mut self, id: CombatantId, amount: u32) -> Result<u32, BattleError> {
        let index = self.battle_index(id)?;
        let change = self.roster[index].take_damage(amount);
        if change.amount > 0 {
            self.emit_health(index);
        }
        if change.defeated {
            tracing::debug!(combatant = %id, "combatant defeated");
            self.emit(BattleEvent::CombatantDefeated { combatant: id });

            if self.current == Some(id) && self.state == BattleState::WaitingForActorInput {
                tracing::debug!(combatant = %id, "actor defeated while waiting; turn forfeited");
                self.finish_turn();
            }
        }
        Ok(change.amount)
    }

    /// Restores hit points to a living combatant. Returns the amount restored.
    pub fn heal(&mut self, id: CombatantId, amount: u32) -> Result<u32, BattleError> {
        let index = self.battle_index(id)?;
        let healed = self.roster[index].heal(amount);
        if healed > 0 {
            self.emit_health(index);
        }
        Ok(healed)
    }

    fn battle_index(&self, id: CombatantId) -> Result<usize, BattleError> {
        if self.state == BattleState::Idle {
            return Err(BattleError::NotInBattle);
        }
        self.index_of(id).ok_or(BattleError::CombatantNotFound(id))
    }

    fn awaiting_actor(&self) -> Result<usize, BattleError> {
        let not_waiting = BattleError::NotAwaitingInput { state: self.state };
        if self.state != BattleState::WaitingForActorInput {
            return Err(not_waiting);
        }
        self.current
            .and_then(|id| self.index_of(id))
            .ok_or(not_waiting)
    }

    fn resolve_target(&self, actor: usize, target: Target) -> Result<usize, BattleError> {
        let side = self.roster[actor].side();
        let index = match target {
            Target::Index(position) => {
                let opponents: Vec<usize> = (0..self.roster.len())
                    .filter(|&i| side.opposes(self.roster[i].side()))
                    .collect();
                opponents
                    .get(position)
                    .copied()
                    .ok_or(BattleError::TargetOutOfRange {
                        index: position,
                        len: opponents.len(),
                    })?
            }
            Target::Id(id) => {
                let index = self.index_of(id).ok_or(BattleError::CombatantNotFound(id))?;
                if !side.opposes(self.roster[index].side()) {
                    return Err(BattleError::NotAnOpponent(id));
                }
                index
            }
        };

        let combatant = &self.roster[index];
        if !combatant.is_alive() {
            return Err(BattleError::TargetDefeated(combatant.id()));
        }
        Ok(index)
    }
}
