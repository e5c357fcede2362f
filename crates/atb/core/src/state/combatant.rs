//! A single participant in a battle.

use crate::config::GaugeConfig;
use crate::turn::ReadinessGauge;

use super::stats::{Attributes, HpChange, Vitals};
use super::{CombatantId, Control, Side};

/// Identity, stats, readiness gauge and stance of one combatant.
///
/// Gauge and hit point mutations are crate-private: once a battle has
/// started, only the scheduler changes them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    id: CombatantId,
    name: String,
    side: Side,
    control: Control,
    attributes: Attributes,
    vitals: Vitals,
    gauge: ReadinessGauge,
    guarding: bool,
}

impl Combatant {
    /// Creates an AI-controlled combatant at full health with an empty gauge
    /// whose rate is derived from agility.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        attributes: Attributes,
        gauge: &GaugeConfig,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            side: Side::default(),
            control: Control::default(),
            attributes,
            vitals: Vitals::for_attributes(&attributes),
            gauge: ReadinessGauge::new(gauge.threshold, gauge.rate_for(attributes.agility())),
            guarding: false,
        }
    }

    #[must_use]
    pub fn with_control(mut self, control: Control) -> Self {
        self.control = control;
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Overrides the derived accumulation rate.
    #[must_use]
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.gauge = ReadinessGauge::new(self.gauge.threshold(), rate);
        self
    }

    /// Overrides the current hit points (clamped to the maximum).
    #[must_use]
    pub fn with_hp(mut self, current: u32) -> Self {
        self.vitals = self.vitals.with_current(current);
        self
    }

    #[must_use]
    pub fn with_vitals(mut self, vitals: Vitals) -> Self {
        self.vitals = vitals;
        self
    }

    pub const fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn side(&self) -> Side {
        self.side
    }

    pub const fn control(&self) -> Control {
        self.control
    }

    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub const fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub const fn gauge(&self) -> &ReadinessGauge {
        &self.gauge
    }

    pub const fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }

    pub fn is_ready(&self) -> bool {
        self.gauge.is_ready()
    }

    pub const fn is_guarding(&self) -> bool {
        self.guarding
    }

    pub const fn current_gauge(&self) -> f64 {
        self.gauge.current()
    }

    pub fn time_to_ready(&self) -> f64 {
        self.gauge.time_to_ready()
    }

    pub(crate) fn set_side(&mut self, side: Side) {
        self.side = side;
    }

    /// Advances the gauge unless the combatant is dead. Returns the ready edge.
    pub(crate) fn advance_gauge(&mut self, dt: f64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.gauge.advance(dt)
    }

    pub(crate) fn reset_gauge(&mut self) {
        self.gauge.reset();
    }

    /// Turn start: a guarding stance lasts until the owner's next turn.
    pub(crate) fn begin_turn(&mut self) {
        self.guarding = false;
    }

    pub(crate) fn set_guarding(&mut self, guarding: bool) {
        self.guarding = guarding;
    }

    pub(crate) fn take_damage(&mut self, amount: u32) -> HpChange {
        self.vitals.take_damage(amount)
    }

    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        self.vitals.heal(amount)
    }
}
