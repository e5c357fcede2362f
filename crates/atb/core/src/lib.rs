//! Deterministic Active-Time-Battle rules.
//!
//! `atb-core` owns the whole battle model: per-combatant readiness gauges,
//! the FIFO ready queue, the turn state machine, dice-based attack
//! resolution and the side-effect-free turn-order forecast. Every state
//! change flows through [`engine::TurnScheduler`]; collaborators observe it
//! through [`event::BattleObserver`] and poll it through its query methods.
//!
//! Modules are organized by responsibility:
//! - [`turn`] hosts the gauge, the ready queue and the order predictor
//! - [`state`] defines combatants, attributes and the battle state machine
//! - [`combat`] resolves attacks from dice rolls
//! - [`engine`] drives ticks, turns and commands
//! - [`rng`] and [`targeting`] are the substitutable random/AI seams
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod rng;
pub mod state;
pub mod targeting;
pub mod turn;

pub use combat::{AttackOutcome, DiceRoll, DiceType, resolve_attack};
pub use config::{ActionPacing, BattleConfig, CombatTables, GaugeConfig};
pub use engine::{BattleRoster, Command, Target, TurnScheduler};
pub use error::{BattleError, ErrorClass};
pub use event::{BattleEvent, BattleObserver, EventLog, ObserverId};
pub use rng::{PcgRng, RandomSource, ScriptedDice};
pub use state::{
    Attributes, BattleOutcome, BattleState, BattleSummary, Combatant, CombatantId, Control, Side,
    Vitals,
};
pub use targeting::{LowestHealthTarget, RandomTarget, TargetSelector};
pub use turn::{ReadinessGauge, ReadyQueue, predict_order};
