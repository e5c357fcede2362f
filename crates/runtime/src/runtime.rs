//! High-level battle driver.
//!
//! [`BattleRuntime`] owns a [`TurnScheduler`], advances it by a fixed tick,
//! asks a [`CommandProvider`] whenever a human-controlled combatant is up,
//! and republishes every scheduler notification on an [`EventBus`].

use std::time::Duration;

use atb_core::{
    ActionPacing, BattleRoster, BattleState, BattleSummary, Combatant, ErrorClass, PcgRng,
    RandomSource, TargetSelector, TurnScheduler,
};
use tokio::sync::broadcast;

use crate::api::{BattleView, CommandProvider, FirstLivingTarget, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{BusObserver, Event, EventBus, TickClock, Topic};

/// Drives one battle at a time to completion.
pub struct BattleRuntime {
    config: RuntimeConfig,
    seed: u64,
    scheduler: TurnScheduler,
    provider: Box<dyn CommandProvider>,
    bus: EventBus,
    clock: TickClock,
    tick: u64,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Seed the dice and AI targeting were initialized with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    /// Direct access for external effects (`apply_damage`, `heal`, speed).
    pub fn scheduler_mut(&mut self) -> &mut TurnScheduler {
        &mut self.scheduler
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to battle events on one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Ticks stepped since the current battle started.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn set_provider(&mut self, provider: impl CommandProvider + 'static) {
        self.provider = Box::new(provider);
    }

    pub fn start(&mut self, allies: Vec<Combatant>, enemies: Vec<Combatant>) -> Result<()> {
        self.start_with(BattleRoster::new(allies, enemies))
    }

    pub fn start_with(&mut self, roster: BattleRoster) -> Result<()> {
        self.tick = 0;
        self.clock.set(0);
        self.scheduler.start_battle_with(roster)?;
        tracing::info!(seed = self.seed, "battle runtime started");
        Ok(())
    }

    /// Advances one tick and settles any input or completion the scheduler
    /// is waiting on. Returns the state after the step.
    pub async fn step(&mut self) -> Result<BattleState> {
        self.tick += 1;
        self.clock.set(self.tick);
        self.scheduler.advance(self.config.tick)?;
        self.settle().await?;
        Ok(self.scheduler.state())
    }

    /// Steps until the battle ends and returns its summary.
    ///
    /// A battle still running after `max_ticks` is force-ended and reported
    /// as [`RuntimeError::TickLimit`].
    pub async fn run(&mut self) -> Result<BattleSummary> {
        self.settle().await?;
        while self.scheduler.is_in_battle() {
            if self.tick >= self.config.max_ticks {
                tracing::warn!(max_ticks = self.config.max_ticks, "tick limit reached; forcing end");
                self.scheduler.force_end();
                return Err(RuntimeError::TickLimit {
                    max_ticks: self.config.max_ticks,
                });
            }
            self.step().await?;
            if self.config.realtime {
                let pause = Duration::try_from_secs_f64(self.config.tick).unwrap_or_default();
                tokio::time::sleep(pause).await;
            }
        }

        let summary = self
            .scheduler
            .last_summary()
            .cloned()
            .ok_or(RuntimeError::NoSummary)?;
        tracing::info!(
            outcome = %summary.outcome,
            turns = summary.turns_taken,
            ticks = self.tick,
            "battle runtime finished"
        );
        Ok(summary)
    }

    /// Starts a battle and runs it to completion.
    pub async fn run_battle(
        &mut self,
        allies: Vec<Combatant>,
        enemies: Vec<Combatant>,
    ) -> Result<BattleSummary> {
        self.start(allies, enemies)?;
        self.run().await
    }

    async fn settle(&mut self) -> Result<()> {
        loop {
            match self.scheduler.state() {
                BattleState::WaitingForActorInput => self.request_command().await?,
                BattleState::ExecutingAction if self.completes_actions() => {
                    self.scheduler.complete_action()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn completes_actions(&self) -> bool {
        self.config.auto_complete_actions
            && matches!(self.scheduler.config().action_pacing, ActionPacing::External)
    }

    /// Asks the provider for the waiting actor's command, retrying rejected
    /// targets up to `max_command_attempts` times.
    async fn request_command(&mut self) -> Result<()> {
        let Some(actor) = self.scheduler.current_actor_id() else {
            return Ok(());
        };

        let mut attempts = 0;
        loop {
            let view = BattleView::capture(&self.scheduler, actor);
            let command = self.provider.provide_command(actor, &view).await?;
            attempts += 1;

            match self.scheduler.submit_command(command) {
                Ok(()) => return Ok(()),
                Err(error)
                    if error.class() == ErrorClass::InvalidTarget
                        && attempts < self.config.max_command_attempts =>
                {
                    tracing::warn!(combatant = %actor, attempts, %error, "command rejected; asking again");
                }
                Err(source) => {
                    return Err(RuntimeError::CommandRejected {
                        actor,
                        attempts,
                        source,
                    });
                }
            }
        }
    }
}

/// Builder for [`BattleRuntime`].
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    provider: Option<Box<dyn CommandProvider>>,
    rng: Option<Box<dyn RandomSource>>,
    selector: Option<Box<dyn TargetSelector>>,
    bus: Option<EventBus>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            provider: None,
            rng: None,
            selector: None,
            bus: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provider for human-controlled combatants (default: [`FirstLivingTarget`]).
    pub fn provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Replaces the seeded generator derived from the configuration.
    pub fn random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// AI target selector (default: uniform random).
    pub fn target_selector(mut self, selector: impl TargetSelector + 'static) -> Self {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Publishes on an existing bus instead of creating one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn build(self) -> BattleRuntime {
        let mut config = self.config;
        if !(config.tick.is_finite() && config.tick > 0.0) {
            tracing::warn!(tick = config.tick, "invalid tick; using default");
            config.tick = RuntimeConfig::DEFAULT_TICK;
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(PcgRng::seeded(seed)));
        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(config.event_buffer_size));
        let clock = TickClock::new();

        let mut scheduler = TurnScheduler::new(config.battle.clone(), rng);
        if let Some(selector) = self.selector {
            scheduler.set_target_selector(selector);
        }
        scheduler.subscribe(BusObserver::new(bus.clone(), clock.clone()));

        BattleRuntime {
            config,
            seed,
            scheduler,
            provider: self
                .provider
                .unwrap_or_else(|| Box::new(FirstLivingTarget)),
            bus,
            clock,
            tick: 0,
        }
    }
}

impl Default for BattleRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
