//! Topic-based event bus implementation.

use std::collections::HashMap;

use atb_core::BattleEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle start/end and state machine transitions
    Battle,
    /// Readiness, turn start/end and input requests
    Turn,
    /// Attacks, guards, health changes and defeats
    Combat,
    /// Gauge resets and fills
    Gauge,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Battle, Topic::Turn, Topic::Combat, Topic::Gauge];

    /// Topic a scheduler notification is published on.
    pub fn of(event: &BattleEvent) -> Self {
        match event {
            BattleEvent::BattleStarted { .. }
            | BattleEvent::BattleEnded { .. }
            | BattleEvent::StateChanged { .. } => Topic::Battle,
            BattleEvent::CombatantReady { .. }
            | BattleEvent::TurnStarted { .. }
            | BattleEvent::TurnEnded { .. }
            | BattleEvent::WaitingForInput { .. } => Topic::Turn,
            BattleEvent::AttackResolved { .. }
            | BattleEvent::Defended { .. }
            | BattleEvent::CombatantDefeated { .. }
            | BattleEvent::HealthChanged { .. } => Topic::Combat,
            BattleEvent::GaugeChanged { .. } => Topic::Gauge,
        }
    }

    const fn index(self) -> usize {
        match self {
            Topic::Battle => 0,
            Topic::Turn => 1,
            Topic::Combat => 2,
            Topic::Gauge => 3,
        }
    }
}

/// A scheduler notification stamped with its position in the battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Emission order across all topics, starting at 0.
    pub sequence: u64,
    /// Runtime tick during which the notification was emitted.
    pub tick: u64,
    pub payload: BattleEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.payload)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning shares the underlying channels.
#[derive(Clone, Debug)]
pub struct EventBus {
    channels: [broadcast::Sender<Event>; 4],
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Topic::ALL.map(|_| broadcast::channel(capacity).0),
        }
    }

    /// Publish an event to its corresponding topic. Best-effort: events with
    /// no subscriber are dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Number of live receivers on `topic`.
    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
