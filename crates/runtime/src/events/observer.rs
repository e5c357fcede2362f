//! Bridge from scheduler notifications to the event bus.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use atb_core::{BattleEvent, BattleObserver};

use super::bus::{Event, EventBus};

/// Shared tick counter read by [`BusObserver`] to stamp events.
#[derive(Clone, Debug, Default)]
pub struct TickClock(Arc<AtomicU64>);

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, tick: u64) {
        self.0.store(tick, Ordering::Relaxed);
    }
}

/// Scheduler observer that republishes every notification on the bus in
/// emission order.
#[derive(Debug)]
pub struct BusObserver {
    bus: EventBus,
    clock: TickClock,
    sequence: u64,
}

impl BusObserver {
    pub fn new(bus: EventBus, clock: TickClock) -> Self {
        Self {
            bus,
            clock,
            sequence: 0,
        }
    }
}

impl BattleObserver for BusObserver {
    fn notify(&mut self, event: &BattleEvent) {
        let sequence = self.sequence;
        self.sequence += 1;
        self.bus.publish(Event {
            sequence,
            tick: self.clock.get(),
            payload: event.clone(),
        });
    }
}
