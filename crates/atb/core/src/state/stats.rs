//! Attributes and hit points.

/// Strength, agility and wisdom, each clamped to `1..=20`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    strength: i32,
    agility: i32,
    wisdom: i32,
}

impl Attributes {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 20;
    /// Modifier = attribute - 5, for every attribute.
    pub const MODIFIER_OFFSET: i32 = 5;

    pub fn new(strength: i32, agility: i32, wisdom: i32) -> Self {
        Self {
            strength: strength.clamp(Self::MIN, Self::MAX),
            agility: agility.clamp(Self::MIN, Self::MAX),
            wisdom: wisdom.clamp(Self::MIN, Self::MAX),
        }
    }

    pub const fn strength(&self) -> i32 {
        self.strength
    }

    pub const fn agility(&self) -> i32 {
        self.agility
    }

    pub const fn wisdom(&self) -> i32 {
        self.wisdom
    }

    pub const fn strength_modifier(&self) -> i32 {
        self.strength - Self::MODIFIER_OFFSET
    }

    pub const fn agility_modifier(&self) -> i32 {
        self.agility - Self::MODIFIER_OFFSET
    }

    pub const fn wisdom_modifier(&self) -> i32 {
        self.wisdom - Self::MODIFIER_OFFSET
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(Self::MIN, Self::MIN, Self::MIN)
    }
}

/// Result of a hit point change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HpChange {
    /// Hit points actually lost or restored.
    pub amount: u32,
    /// True only on the change that took hit points to zero.
    pub defeated: bool,
}

/// Current and maximum hit points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    current: u32,
    max: u32,
}

impl Vitals {
    pub const BASE_HP: u32 = 10;
    pub const HP_PER_STRENGTH: u32 = 2;

    /// Full health with the given maximum (at least 1).
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Full health with `max = 10 + 2 * strength`.
    pub fn for_attributes(attributes: &Attributes) -> Self {
        let strength = attributes.strength().max(0) as u32;
        Self::new(Self::BASE_HP + strength * Self::HP_PER_STRENGTH)
    }

    /// Overrides the current hit points, clamped to `0..=max`.
    #[must_use]
    pub fn with_current(mut self, current: u32) -> Self {
        self.current = current.min(self.max);
        self
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    pub const fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn ratio(&self) -> f64 {
        f64::from(self.current) / f64::from(self.max)
    }

    /// Removes up to `amount` hit points. The dead take no further damage.
    pub fn take_damage(&mut self, amount: u32) -> HpChange {
        if amount == 0 || !self.is_alive() {
            return HpChange::default();
        }
        let lost = amount.min(self.current);
        self.current -= lost;
        HpChange {
            amount: lost,
            defeated: self.current == 0,
        }
    }

    /// Restores up to `amount` hit points. The dead cannot be healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if amount == 0 || !self.is_alive() {
            return 0;
        }
        let restored = amount.min(self.max - self.current);
        self.current += restored;
        restored
    }

    pub fn full_heal(&mut self) -> u32 {
        self.heal(self.max - self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_clamped_and_modifiers_linear() {
        let attributes = Attributes::new(0, 25, 8);
        assert_eq!(attributes.strength(), 1);
        assert_eq!(attributes.agility(), 20);
        assert_eq!(attributes.strength_modifier(), -4);
        assert_eq!(attributes.agility_modifier(), 15);
        assert_eq!(attributes.wisdom_modifier(), 3);
    }

    #[test]
    fn max_hp_scales_with_strength() {
        let vitals = Vitals::for_attributes(&Attributes::new(8, 5, 5));
        assert_eq!(vitals.max(), 26);
        assert_eq!(vitals.current(), 26);
    }

    #[test]
    fn death_is_reported_once() {
        let mut vitals = Vitals::new(5);
        let first = vitals.take_damage(3);
        assert_eq!(first, HpChange { amount: 3, defeated: false });

        let second = vitals.take_damage(10);
        assert_eq!(second, HpChange { amount: 2, defeated: true });

        let third = vitals.take_damage(4);
        assert_eq!(third, HpChange::default());
        assert!(!vitals.is_alive());
    }

    #[test]
    fn heal_is_capped_and_ignores_the_dead() {
        let mut vitals = Vitals::new(10).with_current(4);
        assert_eq!(vitals.heal(3), 3);
        assert_eq!(vitals.full_heal(), 3);
        assert_eq!(vitals.current(), 10);

        let mut dead = Vitals::new(10).with_current(0);
        assert_eq!(dead.heal(5), 0);
        assert_eq!(dead.full_heal(), 0);
    }
}
