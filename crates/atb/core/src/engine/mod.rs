//! Turn scheduling and the battle state machine.
//!
//! [`TurnScheduler`] is the only owner of the roster, the ready queue and the
//! battle state. Callers drive it with [`TurnScheduler::advance`], supply
//! human decisions with [`TurnScheduler::submit_command`], and read it back
//! through the query methods below. Its behaviour is split by phase:
//! - `lifecycle`: battle start, turn start/finish, end condition, teardown
//! - `tick`: gauge accumulation, pending delays and dispatch
//! - `command`: external commands and stat changes

mod command;
mod lifecycle;
mod tick;

pub use command::{Command, Target};
pub use lifecycle::BattleRoster;

use crate::config::BattleConfig;
use crate::event::{BattleEvent, BattleObserver, ObserverId, Observers};
use crate::rng::RandomSource;
use crate::state::{BattleState, BattleSummary, Combatant, CombatantId, Side};
use crate::targeting::{RandomTarget, TargetSelector};
use crate::turn::{ReadyQueue, predict_order};

/// Turn closing deferred by [`ActionPacing`](crate::config::ActionPacing).
#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingAction {
    /// Battle time left before the turn closes; `None` waits for `complete_action`.
    remaining: Option<f64>,
}

/// Active-Time-Battle scheduler.
///
/// Invariant: `current_actor()` is `Some` iff the state is
/// `WaitingForActorInput` or `ExecutingAction`.
pub struct TurnScheduler {
    config: BattleConfig,
    state: BattleState,
    roster: Vec<Combatant>,
    queue: ReadyQueue,
    current: Option<CombatantId>,
    pending: Option<PendingAction>,
    rng: Box<dyn RandomSource>,
    selector: Box<dyn TargetSelector>,
    observers: Observers,
    turns_taken: u64,
    elapsed: f64,
    last_summary: Option<BattleSummary>,
}

impl TurnScheduler {
    /// Creates an idle scheduler. AI actors attack a uniformly random living
    /// opponent until another selector is installed.
    pub fn new(config: BattleConfig, rng: impl RandomSource + 'static) -> Self {
        let mut config = config;
        config.speed_multiplier = BattleConfig::clamp_speed(config.speed_multiplier);
        Self {
            config,
            state: BattleState::Idle,
            roster: Vec::new(),
            queue: ReadyQueue::new(),
            current: None,
            pending: None,
            rng: Box::new(rng),
            selector: Box::new(RandomTarget),
            observers: Observers::default(),
            turns_taken: 0,
            elapsed: 0.0,
            last_summary: None,
        }
    }

    #[must_use]
    pub fn with_target_selector(mut self, selector: impl TargetSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn set_target_selector(&mut self, selector: impl TargetSelector + 'static) {
        self.selector = Box::new(selector);
    }

    /// Registers an observer. Observers are notified in registration order.
    pub fn subscribe(&mut self, observer: impl BattleObserver + 'static) -> ObserverId {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Changes the battle speed. Values below the minimum are raised to it.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.config.speed_multiplier = BattleConfig::clamp_speed(multiplier);
        tracing::debug!(
            speed = self.config.speed_multiplier,
            "speed multiplier changed"
        );
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub const fn state(&self) -> BattleState {
        self.state
    }

    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn is_in_battle(&self) -> bool {
        self.state.is_in_battle()
    }

    pub const fn current_actor_id(&self) -> Option<CombatantId> {
        self.current
    }

    pub fn current_actor(&self) -> Option<&Combatant> {
        self.current.and_then(|id| self.combatant(id))
    }

    /// The roster in turn-scan order: allies, then enemies, then others.
    /// Empty while idle.
    pub fn combatants(&self) -> &[Combatant] {
        &self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.id() == id)
    }

    pub fn alive_allies(&self) -> impl Iterator<Item = &Combatant> {
        self.alive_on(Side::Ally)
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.alive_on(Side::Enemy)
    }

    /// Every combatant `id` may attack, living or not, in roster order.
    ///
    /// This is the list [`Target::Index`] indexes into.
    pub fn opponents_of(&self, id: CombatantId) -> Vec<&Combatant> {
        let Some(side) = self.combatant(id).map(Combatant::side) else {
            return Vec::new();
        };
        self.roster
            .iter()
            .filter(|c| side.opposes(c.side()))
            .collect()
    }

    /// Combatants ordered by gauge fill, fullest first. Ties keep roster order.
    pub fn sorted_by_gauge(&self) -> Vec<&Combatant> {
        let mut sorted: Vec<&Combatant> = self.roster.iter().collect();
        sorted.sort_by(|a, b| b.gauge().ratio().total_cmp(&a.gauge().ratio()));
        sorted
    }

    pub const fn ready_queue(&self) -> &ReadyQueue {
        &self.queue
    }

    pub fn current_gauge(&self, id: CombatantId) -> Option<f64> {
        self.combatant(id).map(Combatant::current_gauge)
    }

    /// Gauge fill in `0.0..=1.0`.
    pub fn gauge_ratio(&self, id: CombatantId) -> Option<f64> {
        self.combatant(id).map(|c| c.gauge().ratio())
    }

    pub fn time_to_ready(&self, id: CombatantId) -> Option<f64> {
        self.combatant(id).map(Combatant::time_to_ready)
    }

    /// Forecast of the next `count` turns from the current gauges.
    ///
    /// The current actor is included at its full gauge. Deaths within the
    /// forecast horizon are not modelled.
    pub fn predict_order(&self, count: usize) -> Vec<CombatantId> {
        predict_order(&self.roster, count)
    }

    /// Number of turns started in the current (or last) battle.
    pub const fn turns_taken(&self) -> u64 {
        self.turns_taken
    }

    /// Battle time advanced in the current (or last) battle.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Summary of the most recently finished battle.
    pub const fn last_summary(&self) -> Option<&BattleSummary> {
        self.last_summary.as_ref()
    }

    pub fn take_summary(&mut self) -> Option<BattleSummary> {
        self.last_summary.take()
    }

    // ------------------------------------------------------------------
    // Internal helpers shared by the phase modules
    // ------------------------------------------------------------------

    fn alive_on(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.roster
            .iter()
            .filter(move |c| c.side() == side && c.is_alive())
    }

    fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.roster.iter().position(|c| c.id() == id)
    }

    fn emit(&mut self, event: BattleEvent) {
        self.observers.emit(event);
    }

    fn set_state(&mut self, to: BattleState) {
        if self.state == to {
            return;
        }
        let from = std::mem::replace(&mut self.state, to);
        tracing::debug!(%from, %to, "battle state changed");
        self.emit(BattleEvent::StateChanged { from, to });
    }

    fn emit_gauge(&mut self, index: usize) {
        let combatant = &self.roster[index];
        let event = BattleEvent::GaugeChanged {
            combatant: combatant.id(),
            current: combatant.current_gauge(),
            max: combatant.gauge().threshold(),
        };
        self.emit(event);
    }

    fn emit_health(&mut self, index: usize) {
        let combatant = &self.roster[index];
        let event = BattleEvent::HealthChanged {
            combatant: combatant.id(),
            current: combatant.vitals().current(),
            max: combatant.vitals().max(),
        };
        self.emit(event);
    }
}

/// Borrows `attacker` immutably and `defender` mutably from one roster.
///
/// The indices must differ.
fn pair_mut(
    roster: &mut [Combatant],
    attacker: usize,
    defender: usize,
) -> (&Combatant, &mut Combatant) {
    debug_assert_ne!(attacker, defender);
    if attacker < defender {
        let (head, tail) = roster.split_at_mut(defender);
        (&head[attacker], &mut tail[0])
    } else {
        let (head, tail) = roster.split_at_mut(attacker);
        (&tail[0], &mut head[defender])
    }
}
