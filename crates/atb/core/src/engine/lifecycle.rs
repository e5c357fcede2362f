use std::collections::HashSet;

use crate::combat::resolve_attack;
use crate::config::ActionPacing;
use crate::error::BattleError;
use crate::event::BattleEvent;
use crate::state::{BattleOutcome, BattleState, BattleSummary, Combatant, Control, Side};

use super::{PendingAction, TurnScheduler, pair_mut};

/// Participants of a battle, grouped by side.
///
/// Sides are assigned from the group a combatant is placed in, whatever
/// side it carried before.
#[derive(Clone, Debug, Default)]
pub struct BattleRoster {
    allies: Vec<Combatant>,
    enemies: Vec<Combatant>,
    others: Vec<Combatant>,
}

impl BattleRoster {
    pub fn new(allies: Vec<Combatant>, enemies: Vec<Combatant>) -> Self {
        Self {
            allies,
            enemies,
            others: Vec::new(),
        }
    }

    /// Adds combatants that take turns without belonging to either side.
    #[must_use]
    pub fn with_others(mut self, others: Vec<Combatant>) -> Self {
        self.others = others;
        self
    }

    fn validate(&self) -> Result<(), BattleError> {
        if self.allies.is_empty() {
            return Err(BattleError::EmptySide(Side::Ally));
        }
        if self.enemies.is_empty() {
            return Err(BattleError::EmptySide(Side::Enemy));
        }
        let mut seen = HashSet::new();
        for combatant in self.allies.iter().chain(&self.enemies).chain(&self.others) {
            if !seen.insert(combatant.id()) {
                return Err(BattleError::DuplicateCombatant(combatant.id()));
            }
        }
        Ok(())
    }

    /// Flattens into scan order with sides assigned.
    fn into_roster(self) -> Vec<Combatant> {
        let groups = [
            (Side::Ally, self.allies),
            (Side::Enemy, self.enemies),
            (Side::Other, self.others),
        ];
        groups
            .into_iter()
            .flat_map(|(side, members)| {
                members.into_iter().map(move |mut combatant| {
                    combatant.set_side(side);
                    combatant
                })
            })
            .collect()
    }
}

/// Battle start, turn lifecycle and teardown.
impl TurnScheduler {
    /// Starts a battle between `allies` and `enemies`.
    ///
    /// Moves `Idle -> Initializing -> Running`, resetting every gauge to 0.
    pub fn start_battle(
        &mut self,
        allies: Vec<Combatant>,
        enemies: Vec<Combatant>,
    ) -> Result<(), BattleError> {
        self.start_battle_with(BattleRoster::new(allies, enemies))
    }

    pub fn start_battle_with(&mut self, roster: BattleRoster) -> Result<(), BattleError> {
        if self.state != BattleState::Idle {
            tracing::warn!(state = %self.state, "battle start rejected: already in battle");
            return Err(BattleError::BattleAlreadyActive { state: self.state });
        }
        roster
            .validate()
            .inspect_err(|error| tracing::warn!(%error, "battle start rejected"))?;

        let allies = roster.allies.len();
        let enemies = roster.enemies.len();

        self.roster = roster.into_roster();
        self.queue.clear();
        self.current = None;
        self.pending = None;
        self.turns_taken = 0;
        self.elapsed = 0.0;
        self.last_summary = None;

        self.set_state(BattleState::Initializing);
        for index in 0..self.roster.len() {
            let combatant = &mut self.roster[index];
            combatant.reset_gauge();
            combatant.set_guarding(false);
            self.emit_gauge(index);
        }

        let others = self.roster.len() - allies - enemies;
        tracing::info!(allies, enemies, others, "battle started");
        self.emit(BattleEvent::BattleStarted { allies, enemies });
        self.set_state(BattleState::Running);
        Ok(())
    }

    /// Aborts the battle as a defeat without evaluating the end condition.
    ///
    /// Returns false if no battle was in progress.
    pub fn force_end(&mut self) -> bool {
        if self.state == BattleState::Idle {
            return false;
        }
        tracing::info!(state = %self.state, "battle force-ended");
        self.end_battle(BattleOutcome::Defeat, true);
        true
    }

    /// Makes the combatant at `index` the current actor.
    pub(super) fn start_turn(&mut self, index: usize) {
        let combatant = &mut self.roster[index];
        combatant.begin_turn();
        let id = combatant.id();
        let control = combatant.control();

        self.current = Some(id);
        self.turns_taken += 1;
        tracing::debug!(combatant = %id, %control, turn = self.turns_taken, "turn started");
        self.emit(BattleEvent::TurnStarted { combatant: id });

        match control {
            Control::Human => {
                self.set_state(BattleState::WaitingForActorInput);
                self.emit(BattleEvent::WaitingForInput { combatant: id });
            }
            Control::Ai => {
                self.set_state(BattleState::ExecutingAction);
                self.run_ai_action(index);
                self.commit_pacing();
            }
        }
    }

    /// Picks a target through the selector and resolves the attack.
    fn run_ai_action(&mut self, actor: usize) {
        let attacker = &self.roster[actor];
        let candidates: Vec<&Combatant> = self
            .roster
            .iter()
            .filter(|c| c.is_alive() && attacker.side().opposes(c.side()))
            .collect();

        let chosen = self
            .selector
            .select(attacker, &candidates, self.rng.as_mut())
            .filter(|id| candidates.iter().any(|c| c.id() == *id))
            .or_else(|| candidates.first().map(|c| c.id()));

        let Some(target) = chosen.and_then(|id| self.index_of(id)) else {
            tracing::debug!(combatant = %attacker.id(), "no opponent to attack; turn passes");
            return;
        };
        self.perform_attack(actor, target);
    }

    /// Resolves an attack between two roster entries and reports the result.
    pub(super) fn perform_attack(&mut self, attacker: usize, defender: usize) {
        let (source, target) = pair_mut(&mut self.roster, attacker, defender);
        let outcome = resolve_attack(source, target, 0, self.rng.as_mut(), &self.config.combat);
        let attacker_id = source.id();
        let defender_id = target.id();

        tracing::debug!(
            attacker = %attacker_id,
            defender = %defender_id,
            roll = outcome.attack_roll,
            defense = outcome.defense,
            hit = outcome.hit,
            critical = outcome.critical,
            damage = outcome.damage,
            dealt = outcome.dealt,
            "attack resolved"
        );
        self.emit(BattleEvent::AttackResolved {
            attacker: attacker_id,
            defender: defender_id,
            outcome,
        });
        if outcome.dealt > 0 {
            self.emit_health(defender);
        }
        if outcome.defeated {
            tracing::debug!(combatant = %defender_id, "combatant defeated");
            self.emit(BattleEvent::CombatantDefeated {
                combatant: defender_id,
            });
        }
    }

    pub(super) fn perform_defend(&mut self, actor: usize) {
        let combatant = &mut self.roster[actor];
        combatant.set_guarding(true);
        let id = combatant.id();
        tracing::debug!(combatant = %id, "defending");
        self.emit(BattleEvent::Defended { combatant: id });
    }

    /// Closes the committed action now or defers it, per the configured pacing.
    pub(super) fn commit_pacing(&mut self) {
        match self.config.action_pacing {
            ActionPacing::Delay(delay) if delay > 0.0 => {
                self.pending = Some(PendingAction {
                    remaining: Some(delay),
                });
            }
            ActionPacing::External => {
                self.pending = Some(PendingAction { remaining: None });
            }
            ActionPacing::Immediate | ActionPacing::Delay(_) => self.finish_turn(),
        }
    }

    /// Ends the current turn: resets the actor's gauge, clears the actor and
    /// evaluates the end condition.
    pub(super) fn finish_turn(&mut self) {
        let Some(id) = self.current.take() else {
            return;
        };
        self.pending = None;
        if let Some(index) = self.index_of(id) {
            self.roster[index].reset_gauge();
            self.emit_gauge(index);
        }
        tracing::debug!(combatant = %id, "turn ended");
        self.emit(BattleEvent::TurnEnded { combatant: id });

        if !self.check_end_condition() {
            self.set_state(BattleState::Running);
        }
    }

    /// Outcome implied by the roster: allies wiped out loses, checked before
    /// enemies wiped out.
    pub(super) fn battle_outcome(&self) -> Option<BattleOutcome> {
        if self.alive_allies().next().is_none() {
            Some(BattleOutcome::Defeat)
        } else if self.alive_enemies().next().is_none() {
            Some(BattleOutcome::Victory)
        } else {
            None
        }
    }

    /// Ends the battle if one side has been wiped out. Returns true if it did.
    pub(super) fn check_end_condition(&mut self) -> bool {
        match self.battle_outcome() {
            Some(outcome) => {
                self.end_battle(outcome, false);
                true
            }
            None => false,
        }
    }

    /// Enters the terminal state, notifies, and tears down to `Idle`.
    fn end_battle(&mut self, outcome: BattleOutcome, forced: bool) {
        self.current = None;
        self.pending = None;

        let terminal = match outcome {
            BattleOutcome::Victory => BattleState::Victory,
            BattleOutcome::Defeat => BattleState::Defeat,
        };
        self.set_state(terminal);
        tracing::info!(
            %outcome,
            forced,
            turns = self.turns_taken,
            elapsed = self.elapsed,
            "battle ended"
        );
        self.emit(BattleEvent::BattleEnded { outcome });

        self.queue.clear();
        self.last_summary = Some(BattleSummary {
            outcome,
            forced,
            turns_taken: self.turns_taken,
            elapsed: self.elapsed,
            combatants: std::mem::take(&mut self.roster),
        });
        self.set_state(BattleState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BattleConfig;
    use crate::engine::fixtures::*;
    use crate::error::{BattleError, ErrorClass};
    use crate::event::BattleEvent;
    use crate::state::{BattleOutcome, BattleState, CombatantId, Side};

    use super::BattleRoster;

    fn ended(events: &[BattleEvent]) -> Vec<BattleOutcome> {
        events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::BattleEnded { outcome } => Some(*outcome),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_moves_through_initializing_to_running() {
        let (mut scheduler, log) = scheduler([]);
        scheduler
            .start_battle(vec![unit(1, 10.0)], vec![unit(2, 10.0)])
            .unwrap();

        assert_eq!(scheduler.state(), BattleState::Running);
        assert_eq!(scheduler.combatant(CombatantId(1)).unwrap().side(), Side::Ally);
        assert_eq!(scheduler.combatant(CombatantId(2)).unwrap().side(), Side::Enemy);

        let events = log.events();
        assert_eq!(
            events.first(),
            Some(&BattleEvent::StateChanged {
                from: BattleState::Idle,
                to: BattleState::Initializing,
            })
        );
        assert!(events.contains(&BattleEvent::BattleStarted {
            allies: 1,
            enemies: 1,
        }));
        assert_eq!(
            events.last(),
            Some(&BattleEvent::StateChanged {
                from: BattleState::Initializing,
                to: BattleState::Running,
            })
        );
    }

    #[test]
    fn second_start_is_rejected_without_change() {
        let (mut scheduler, log) = scheduler([]);
        scheduler
            .start_battle(vec![unit(1, 10.0)], vec![unit(2, 10.0)])
            .unwrap();
        scheduler.advance(1.0).unwrap();
        let recorded = log.events().len();

        let error = scheduler
            .start_battle(vec![unit(3, 10.0)], vec![unit(4, 10.0)])
            .unwrap_err();
        assert_eq!(
            error,
            BattleError::BattleAlreadyActive {
                state: BattleState::Running
            }
        );
        assert_eq!(error.class(), ErrorClass::Protocol);
        assert_eq!(scheduler.combatants().len(), 2);
        assert_eq!(scheduler.current_gauge(CombatantId(1)), Some(10.0));
        assert_eq!(log.events().len(), recorded);
    }

    #[test]
    fn malformed_rosters_are_rejected() {
        let (mut scheduler, _) = scheduler([]);

        let error = scheduler.start_battle(vec![], vec![unit(2, 10.0)]).unwrap_err();
        assert_eq!(error, BattleError::EmptySide(Side::Ally));

        let error = scheduler.start_battle(vec![unit(1, 10.0)], vec![]).unwrap_err();
        assert_eq!(error, BattleError::EmptySide(Side::Enemy));

        let error = scheduler
            .start_battle(vec![unit(1, 10.0)], vec![unit(1, 10.0)])
            .unwrap_err();
        assert_eq!(error, BattleError::DuplicateCombatant(CombatantId(1)));
        assert_eq!(error.class(), ErrorClass::InvalidInput);

        assert_eq!(scheduler.state(), BattleState::Idle);
    }

    #[test]
    fn start_resets_gauges_and_guard() {
        let (mut scheduler, _) = scheduler([]);
        scheduler
            .start_battle(vec![unit(1, 50.0)], vec![unit(2, 10.0)])
            .unwrap();
        scheduler.advance(1.0).unwrap();
        scheduler.force_end();

        let survivors = scheduler.take_summary().unwrap().combatants;
        assert_eq!(survivors[0].current_gauge(), 50.0);

        let mut allies = Vec::new();
        let mut enemies = Vec::new();
        for combatant in survivors {
            match combatant.side() {
                Side::Ally => allies.push(combatant),
                _ => enemies.push(combatant),
            }
        }
        scheduler.start_battle(allies, enemies).unwrap();
        assert_eq!(scheduler.current_gauge(CombatantId(1)), Some(0.0));
    }

    #[test]
    fn dead_enemy_ends_battle_on_next_advance() {
        let (mut scheduler, log) = scheduler([]);
        scheduler
            .start_battle(vec![unit(1, 10.0)], vec![unit(2, 10.0)])
            .unwrap();

        assert_eq!(scheduler.apply_damage(CombatantId(2), 1_000).unwrap(), 20);
        assert_eq!(scheduler.state(), BattleState::Running);

        scheduler.advance(0.1).unwrap();
        assert_eq!(scheduler.state(), BattleState::Idle);

        let events = log.events();
        assert_eq!(ended(&events), vec![BattleOutcome::Victory]);
        assert!(events.contains(&BattleEvent::StateChanged {
            from: BattleState::Running,
            to: BattleState::Victory,
        }));
        assert!(events.contains(&BattleEvent::StateChanged {
            from: BattleState::Victory,
            to: BattleState::Idle,
        }));

        let summary = scheduler.last_summary().unwrap();
        assert_eq!(summary.outcome, BattleOutcome::Victory);
        assert!(!summary.forced);
        assert_eq!(summary.survivors().count(), 1);
    }

    #[test]
    fn enemy_defeated_by_turn_ends_in_victory_at_turn_end() {
        // 15 + 15 clears defense 10; any damage finishes the 3 HP enemy
        let (mut scheduler, log) = scheduler([15, 6]);
        let hero = crate::state::Combatant::new(
            CombatantId(1),
            "hero",
            crate::state::Attributes::new(20, 5, 5),
            &crate::config::GaugeConfig::default(),
        )
        .with_rate(100.0);
        scheduler
            .start_battle(vec![hero], vec![unit(2, 1.0).with_hp(3)])
            .unwrap();

        scheduler.advance(1.0).unwrap();

        assert_eq!(scheduler.state(), BattleState::Idle);
        let events = log.events();
        assert_eq!(ended(&events), vec![BattleOutcome::Victory]);
        let turn_end = events
            .iter()
            .position(|e| matches!(e, BattleEvent::TurnEnded { .. }))
            .unwrap();
        let battle_end = events
            .iter()
            .position(|e| matches!(e, BattleEvent::BattleEnded { .. }))
            .unwrap();
        assert!(turn_end < battle_end);
        assert_eq!(scheduler.last_summary().unwrap().turns_taken, 1);
    }

    #[test]
    fn allies_wiped_out_is_defeat() {
        let (mut scheduler, log) = scheduler([]);
        scheduler
            .start_battle(vec![unit(1, 10.0)], vec![unit(2, 10.0)])
            .unwrap();
        scheduler.apply_damage(CombatantId(1), 100).unwrap();
        scheduler.advance(0.0).unwrap();

        assert_eq!(ended(&log.events()), vec![BattleOutcome::Defeat]);
    }

    #[test]
    fn mutual_wipeout_is_a_defeat() {
        let (mut scheduler, log) = scheduler([]);
        scheduler
            .start_battle(vec![unit(1, 10.0)], vec![unit(2, 10.0)])
            .unwrap();
        scheduler.apply_damage(CombatantId(2), 100).unwrap();
        scheduler.apply_damage(CombatantId(1), 100).unwrap();
        scheduler.advance(0.0).unwrap();

        assert_eq!(ended(&log.events()), vec![BattleOutcome::Defeat]);
        assert_eq!(
            scheduler.last_summary().map(|summary| summary.outcome),
            Some(BattleOutcome::Defeat)
        );
    }

    #[test]
    fn force_end_from_any_state_is_a_defeat() {
        let (mut scheduler, log) = scheduler_with(BattleConfig::default(), []);
        assert!(!scheduler.force_end());

        scheduler
            .start_battle(vec![human(1, 100.0)], vec![unit(2, 1.0)])
            .unwrap();
        scheduler.advance(1.0).unwrap();
        assert_eq!(scheduler.state(), BattleState::WaitingForActorInput);

        assert!(scheduler.force_end());
        assert_eq!(scheduler.state(), BattleState::Idle);
        assert!(scheduler.current_actor().is_none());
        assert!(scheduler.ready_queue().is_empty());
        assert!(scheduler.combatants().is_empty());
        assert_eq!(ended(&log.events()), vec![BattleOutcome::Defeat]);
        assert!(scheduler.last_summary().unwrap().forced);

        // a fresh battle can start afterwards
        scheduler
            .start_battle(vec![unit(1, 10.0)], vec![unit(2, 10.0)])
            .unwrap();
    }

    #[test]
    fn others_take_turns_but_do_not_decide_the_battle() {
        let (mut scheduler, log) = scheduler([]);
        let roster = BattleRoster::new(vec![unit(1, 1.0)], vec![unit(2, 1.0)])
            .with_others(vec![unit(3, 100.0)]);
        scheduler.start_battle_with(roster).unwrap();

        scheduler.advance(1.0).unwrap();
        assert_eq!(scheduler.state(), BattleState::Running);
        assert!(log.events().contains(&BattleEvent::TurnEnded {
            combatant: CombatantId(3)
        }));
        assert_eq!(
            log.count(|e| matches!(e, BattleEvent::AttackResolved { .. })),
            0
        );
    }
}
