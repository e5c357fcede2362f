//! Battle configuration constants and tunable parameters.
//!
//! The defaults give the standard balance: a 100-point gauge
//! filled at `10 + 3 * agility` points per second, a d20 attack against
//! `10 + agility modifier`, and 1.5x critical damage.

use crate::combat::DiceType;

/// Readiness gauge parameters shared by every combatant in a battle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaugeConfig {
    /// Gauge value at which a combatant becomes ready to act.
    pub threshold: f64,
    /// Rate granted regardless of attributes.
    pub base_rate: f64,
    /// Additional rate per point of agility.
    pub agility_coefficient: f64,
}

impl GaugeConfig {
    pub const DEFAULT_THRESHOLD: f64 = 100.0;
    pub const DEFAULT_BASE_RATE: f64 = 10.0;
    pub const DEFAULT_AGILITY_COEFFICIENT: f64 = 3.0;

    /// Accumulation rate for the given agility: `base_rate + agility * coefficient`.
    pub fn rate_for(&self, agility: i32) -> f64 {
        self.base_rate + f64::from(agility) * self.agility_coefficient
    }
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            base_rate: Self::DEFAULT_BASE_RATE,
            agility_coefficient: Self::DEFAULT_AGILITY_COEFFICIENT,
        }
    }
}

/// Balance parameters for attack resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatTables {
    /// Defense value before the defender's agility modifier.
    pub base_defense: i32,
    /// Modified attack roll at or above which the attack is critical.
    pub critical_threshold: i32,
    /// Damage multiplier applied to critical hits.
    pub critical_multiplier: f64,
    /// Die rolled for damage.
    pub damage_die: DiceType,
}

impl Default for CombatTables {
    fn default() -> Self {
        Self {
            base_defense: 10,
            critical_threshold: 20,
            critical_multiplier: 1.5,
            damage_die: DiceType::D6,
        }
    }
}

/// How long a committed action keeps the scheduler in `ExecutingAction`.
///
/// The decision (target choice and dice resolution) is always committed
/// synchronously; pacing only controls when the turn is closed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionPacing {
    /// Close the turn in the same call that committed the action.
    #[default]
    Immediate,
    /// Close the turn after this much battle time has been advanced.
    /// Other combatants keep accumulating in the meantime.
    Delay(f64),
    /// Wait for the presentation layer to call `complete_action`.
    External,
}

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    pub gauge: GaugeConfig,
    pub combat: CombatTables,
    /// Scales every `advance(dt)`; never below [`BattleConfig::MIN_SPEED_MULTIPLIER`].
    pub speed_multiplier: f64,
    pub action_pacing: ActionPacing,
}

impl BattleConfig {
    pub const MIN_SPEED_MULTIPLIER: f64 = 0.1;
    /// Conventional on-screen time for one action, for `ActionPacing::Delay`.
    pub const DEFAULT_ACTION_DELAY: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            gauge: GaugeConfig::default(),
            combat: CombatTables::default(),
            speed_multiplier: 1.0,
            action_pacing: ActionPacing::Immediate,
        }
    }

    #[must_use]
    pub fn with_speed_multiplier(mut self, multiplier: f64) -> Self {
        self.speed_multiplier = Self::clamp_speed(multiplier);
        self
    }

    #[must_use]
    pub fn with_action_pacing(mut self, pacing: ActionPacing) -> Self {
        self.action_pacing = pacing;
        self
    }

    pub(crate) fn clamp_speed(multiplier: f64) -> f64 {
        if multiplier.is_nan() {
            return Self::MIN_SPEED_MULTIPLIER;
        }
        multiplier.max(Self::MIN_SPEED_MULTIPLIER)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
