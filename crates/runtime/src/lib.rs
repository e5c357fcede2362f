//! Runtime orchestration for Active-Time-Battle simulations.
//!
//! This crate drives an [`atb_core::TurnScheduler`] at a fixed tick, sources
//! decisions for human-controlled combatants through an async provider, and
//! republishes battle notifications on a topic-based event bus.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the driver loop and its builder
//! - [`api`] exposes the provider trait and error types
//! - [`events`] provides the topic-based event bus and the scheduler bridge
//! - [`config`] loads runtime settings from the environment
pub mod api;
pub mod config;
pub mod events;
pub mod runtime;

pub use api::{
    BattleView, CommandProvider, FirstLivingTarget, Result, RuntimeError, ScriptedCommands,
};
pub use config::RuntimeConfig;
pub use events::{BusObserver, Event, EventBus, Topic};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder};
