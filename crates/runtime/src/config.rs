//! Runtime configuration and its environment loader.
use std::env;
use std::str::FromStr;

use atb_core::{ActionPacing, BattleConfig};

/// Settings for [`BattleRuntime`](crate::BattleRuntime).
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    /// Battle seconds passed to every `advance`.
    pub tick: f64,
    /// Ticks after which an unfinished battle is force-ended.
    pub max_ticks: u64,
    /// Seed for dice and AI targeting; `None` draws one at build time.
    pub seed: Option<u64>,
    /// Per-topic capacity of the event bus.
    pub event_buffer_size: usize,
    /// Sleep one tick of wall time between steps.
    pub realtime: bool,
    /// Commands requested from the provider per turn before giving up.
    pub max_command_attempts: u32,
    /// Close `External`-paced actions without waiting for a presentation layer.
    pub auto_complete_actions: bool,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK: f64 = 1.0 / 60.0;
    pub const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ATB_SEED` - Fixed seed for a reproducible battle (default: random)
    /// - `ATB_TICK` - Battle seconds per tick (default: 1/60)
    /// - `ATB_MAX_TICKS` - Tick cap before the battle is force-ended (default: 36000)
    /// - `ATB_SPEED` - Battle speed multiplier, at least 0.1 (default: 1.0)
    /// - `ATB_ACTION_DELAY` - Battle seconds each action stays on screen (default: 0)
    /// - `ATB_REALTIME` - Pace ticks with wall-clock sleeps (default: false)
    /// - `ATB_EVENT_BUFFER` - Event bus capacity per topic (default: 256)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.seed = read_var::<u64>(&lookup, "ATB_SEED");

        if let Some(tick) = read_var::<f64>(&lookup, "ATB_TICK")
            && tick.is_finite()
            && tick > 0.0
        {
            config.tick = tick;
        }

        if let Some(max_ticks) = read_var::<u64>(&lookup, "ATB_MAX_TICKS") {
            config.max_ticks = max_ticks.max(1);
        }

        if let Some(speed) = read_var::<f64>(&lookup, "ATB_SPEED") {
            config.battle = config.battle.with_speed_multiplier(speed);
        }

        if let Some(delay) = read_var::<f64>(&lookup, "ATB_ACTION_DELAY") {
            let pacing = if delay.is_finite() && delay > 0.0 {
                ActionPacing::Delay(delay)
            } else {
                ActionPacing::Immediate
            };
            config.battle = config.battle.with_action_pacing(pacing);
        }

        if let Some(realtime) = read_flag(&lookup, "ATB_REALTIME") {
            config.realtime = realtime;
        }

        if let Some(capacity) = read_var::<usize>(&lookup, "ATB_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            tick: Self::DEFAULT_TICK,
            max_ticks: Self::DEFAULT_MAX_TICKS,
            seed: None,
            event_buffer_size: 256,
            realtime: false,
            max_command_attempts: 3,
            auto_complete_actions: true,
        }
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}

/// Parses an on/off environment value. A variable set without a value counts
/// as on.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    let flag = parse_flag(&raw);
    if flag.is_none() {
        tracing::warn!(key, value = %raw, "ignoring unparsable environment variable");
    }
    flag
}
