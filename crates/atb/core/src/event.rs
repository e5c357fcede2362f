//! Battle notifications and the observer list.
//!
//! Observers are called synchronously, in registration order, with events in
//! emission order. Per-frame gauge progress is not pushed; presentation layers
//! poll [`TurnScheduler`](crate::engine::TurnScheduler) for it. `GaugeChanged`
//! fires only when a gauge is reset or fills.

use std::sync::{Arc, Mutex, PoisonError};

use crate::combat::AttackOutcome;
use crate::state::{BattleOutcome, BattleState, CombatantId};

/// Everything the scheduler reports to collaborators.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    BattleStarted {
        allies: usize,
        enemies: usize,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
    StateChanged {
        from: BattleState,
        to: BattleState,
    },
    /// Ready edge: the combatant's gauge filled and it joined the ready queue.
    CombatantReady {
        combatant: CombatantId,
    },
    TurnStarted {
        combatant: CombatantId,
    },
    TurnEnded {
        combatant: CombatantId,
    },
    /// Commands are accepted from now until the turn is committed.
    WaitingForInput {
        combatant: CombatantId,
    },
    AttackResolved {
        attacker: CombatantId,
        defender: CombatantId,
        outcome: AttackOutcome,
    },
    Defended {
        combatant: CombatantId,
    },
    CombatantDefeated {
        combatant: CombatantId,
    },
    HealthChanged {
        combatant: CombatantId,
        current: u32,
        max: u32,
    },
    GaugeChanged {
        combatant: CombatantId,
        current: f64,
        max: f64,
    },
}

impl BattleEvent {
    /// Short name of the variant, for logs and metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BattleStarted { .. } => "battle_started",
            Self::BattleEnded { .. } => "battle_ended",
            Self::StateChanged { .. } => "state_changed",
            Self::CombatantReady { .. } => "combatant_ready",
            Self::TurnStarted { .. } => "turn_started",
            Self::TurnEnded { .. } => "turn_ended",
            Self::WaitingForInput { .. } => "waiting_for_input",
            Self::AttackResolved { .. } => "attack_resolved",
            Self::Defended { .. } => "defended",
            Self::CombatantDefeated { .. } => "combatant_defeated",
            Self::HealthChanged { .. } => "health_changed",
            Self::GaugeChanged { .. } => "gauge_changed",
        }
    }
}

/// Receives battle notifications.
pub trait BattleObserver: Send {
    fn notify(&mut self, event: &BattleEvent);
}

impl<F> BattleObserver for F
where
    F: FnMut(&BattleEvent) + Send,
{
    fn notify(&mut self, event: &BattleEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// Ordered observer list.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u32,
    entries: Vec<(ObserverId, Box<dyn BattleObserver>)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn BattleObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn emit(&mut self, event: BattleEvent) {
        tracing::trace!(kind = event.kind(), "battle event");
        for (_, observer) in &mut self.entries {
            observer.notify(&event);
        }
    }
}

/// Shared, cloneable recorder of every event it observes.
///
/// Register one clone with the scheduler and keep another to inspect.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<BattleEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<BattleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<BattleEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&BattleEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| predicate(event))
            .count()
    }
}

impl BattleObserver for EventLog {
    fn notify(&mut self, event: &BattleEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observers_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut observers = Observers::default();

        let first = Arc::clone(&order);
        observers.subscribe(Box::new(move |_: &BattleEvent| first.lock().unwrap().push(1)));
        let second = Arc::clone(&order);
        observers.subscribe(Box::new(move |_: &BattleEvent| second.lock().unwrap().push(2)));

        observers.emit(BattleEvent::TurnStarted {
            combatant: CombatantId(0),
        });
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let log = EventLog::new();
        let mut observers = Observers::default();
        let id = observers.subscribe(Box::new(log.clone()));

        observers.emit(BattleEvent::Defended {
            combatant: CombatantId(1),
        });
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit(BattleEvent::Defended {
            combatant: CombatantId(1),
        });

        assert_eq!(log.events().len(), 1);
        assert_eq!(observers.len(), 0);
    }
}
