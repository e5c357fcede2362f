//! Seedable random sources for dice rolls and AI choices.
//!
//! Every draw in a battle goes through one [`RandomSource`] owned by the
//! scheduler, so a fixed seed reproduces a fixed battle.
//!
//! # Determinism
//!
//! Implementations must be deterministic: given the same seed they must
//! produce the same sequence of values.

use std::collections::VecDeque;

/// Source of uniform integer draws.
pub trait RandomSource: Send {
    /// Draw the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Roll a die with `sides` faces (1..=sides inclusive).
    ///
    /// A zero-sided die always yields 0.
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        (self.next_u32() % sides) + 1
    }

    /// Draw a value in `[min, max]` inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min + 1;
        min + (self.next_u32() % span)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }

    fn range(&mut self, min: u32, max: u32) -> u32 {
        (**self).range(min, max)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// # Properties
///
/// - **Deterministic**: same seed, same sequence
/// - **Fast**: one multiply, one xorshift, one rotate per draw
/// - **Small state**: 64 bits
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator whose sequence is fully determined by `seed`.
    pub fn seeded(seed: u64) -> Self {
        // Avalanche the seed so nearby seeds diverge immediately.
        let mut hash = seed ^ 0x9e3779b97f4a7c15;
        hash ^= hash >> 33;
        hash = hash.wrapping_mul(0xff51afd7ed558ccd);
        hash ^= hash >> 33;
        Self { state: hash }
    }

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}

/// Test double that returns predetermined die faces.
///
/// Scripted faces are consumed only by [`RandomSource::roll_die`], in order,
/// and clamped into `1..=sides`. Raw draws and range draws (used for AI
/// target choice) come from a seeded [`PcgRng`], as do die rolls once the
/// script runs out.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    fallback: PcgRng,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            fallback: PcgRng::seeded(0),
        }
    }

    /// Replaces the generator used after the script is exhausted.
    #[must_use]
    pub fn with_fallback_seed(mut self, seed: u64) -> Self {
        self.fallback = PcgRng::seeded(seed);
        self
    }

    /// Appends more faces to the script.
    pub fn push(&mut self, face: u32) {
        self.faces.push_back(face);
    }

    /// Number of scripted faces not yet consumed.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl RandomSource for ScriptedDice {
    fn next_u32(&mut self) -> u32 {
        self.fallback.next_u32()
    }

    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        match self.faces.pop_front() {
            Some(face) => face.clamp(1, sides),
            None => self.fallback.roll_die(sides),
        }
    }
}
