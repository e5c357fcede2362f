use crate::error::BattleError;
use crate::event::BattleEvent;
use crate::state::BattleState;

use super::TurnScheduler;

/// Per-tick accumulation and dispatch.
impl TurnScheduler {
    /// Advances battle time by `dt` seconds (scaled by the speed multiplier).
    ///
    /// 1. every living combatant except the current actor accumulates; those
    ///    that fill are enqueued in roster order
    /// 2. a delayed action counts down and closes its turn when it expires
    /// 3. while `Running`, the end condition is checked and queued
    ///    combatants are dispatched until one suspends or the queue empties
    ///
    /// While waiting for input the whole battle is suspended and this is a
    /// no-op.
    pub fn advance(&mut self, dt: f64) -> Result<(), BattleError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(BattleError::InvalidTimeStep(dt));
        }
        match self.state {
            BattleState::Idle => return Err(BattleError::NotInBattle),
            BattleState::WaitingForActorInput => return Ok(()),
            _ => {}
        }

        let scaled = dt * self.config.speed_multiplier;
        self.elapsed += scaled;
        self.accumulate(scaled);

        if self.state == BattleState::ExecutingAction {
            self.count_down_pending(scaled);
        }
        self.dispatch();
        Ok(())
    }

    fn accumulate(&mut self, dt: f64) {
        for index in 0..self.roster.len() {
            let combatant = &mut self.roster[index];
            if Some(combatant.id()) == self.current || !combatant.advance_gauge(dt) {
                continue;
            }
            let id = combatant.id();
            if self.queue.push(id) {
                tracing::debug!(combatant = %id, queued = self.queue.len(), "combatant ready");
                self.emit(BattleEvent::CombatantReady { combatant: id });
                self.emit_gauge(index);
            }
        }
    }

    fn count_down_pending(&mut self, dt: f64) {
        let Some(remaining) = self.pending.as_mut().and_then(|p| p.remaining.as_mut()) else {
            return;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.finish_turn();
        }
    }

    /// Starts queued turns while the scheduler is free to do so.
    pub(super) fn dispatch(&mut self) {
        while self.state == BattleState::Running {
            if self.check_end_condition() {
                return;
            }
            let Some(index) = self.next_ready() else {
                return;
            };
            self.start_turn(index);
        }
    }

    /// Pops the queue until a living combatant is found. Dead entries are
    /// discarded.
    fn next_ready(&mut self) -> Option<usize> {
        while let Some(id) = self.queue.pop() {
            match self.index_of(id) {
                Some(index) if self.roster[index].is_alive() => return Some(index),
                _ => tracing::trace!(combatant = %id, "skipping defeated combatant"),
            }
        }
        None
    }
}
