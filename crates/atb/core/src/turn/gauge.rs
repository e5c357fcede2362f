//! Per-combatant readiness gauge.

/// Relative tolerance under which a gauge snaps to its threshold.
///
/// Absorbs floating-point drift so that advancing by exactly
/// `threshold / rate` in any number of steps reaches the threshold.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Accumulates readiness at a fixed rate until it saturates at the threshold.
///
/// Invariant: `0 <= current <= threshold`. Once full, the gauge is frozen
/// until [`ReadinessGauge::reset`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadinessGauge {
    current: f64,
    threshold: f64,
    rate: f64,
}

impl ReadinessGauge {
    /// Creates an empty gauge. A non-positive `rate` is accepted: such a gauge
    /// never fills.
    pub fn new(threshold: f64, rate: f64) -> Self {
        Self {
            current: 0.0,
            threshold: threshold.max(0.0),
            rate,
        }
    }

    pub const fn current(&self) -> f64 {
        self.current
    }

    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Fill level in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.threshold > 0.0 {
            self.current / self.threshold
        } else {
            0.0
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current >= self.threshold
    }

    /// Accumulates `rate * dt`, capped at the threshold.
    ///
    /// Returns true only on the call that makes the gauge reach its threshold,
    /// so the ready edge fires at most once per reset cycle.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.is_ready() || self.rate <= 0.0 || dt <= 0.0 {
            return false;
        }
        let next = self.current + self.rate * dt;
        self.current = if self.threshold - next <= self.threshold * SNAP_TOLERANCE {
            self.threshold
        } else {
            next
        };
        self.is_ready()
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
    }

    /// Time until the gauge fills at its current rate.
    ///
    /// Zero when already full, infinite when the rate is not positive.
    pub fn time_to_ready(&self) -> f64 {
        if self.is_ready() {
            0.0
        } else if self.rate <= 0.0 {
            f64::INFINITY
        } else {
            (self.threshold - self.current) / self.rate
        }
    }
}
