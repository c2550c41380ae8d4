//! Randomness Source
//!
//! Every random draw in the core (fidget choice, blink and fidget delays,
//! particle spawn and physics jitter) goes through [`RandomSource`] so tests
//! can substitute a seeded or scripted source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// `true` with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform index in `0..len`
    ///
    /// Returns 0 for an empty range.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let idx = (self.next_f32() * len as f32) as usize;
        idx.min(len - 1)
    }
}

/// Thread-local OS-seeded generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f32(&mut self) -> f32 {
        rand::thread_rng().gen::<f32>()
    }
}

/// Reproducible generator seeded from a `u64`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a generator from a seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
///
/// ```
/// use sidekick_core::random::{RandomSource, ScriptedRandom};
///
/// let mut rng = ScriptedRandom::new(vec![0.1, 0.9]);
/// assert!(rng.chance(0.5));
/// assert!(!rng.chance(0.5));
/// assert!(rng.chance(0.5));
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Create a source replaying `values`
    ///
    /// An empty list behaves as a constant `0.0`.
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Source that always returns `value`
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}

/// Build the default source, seeded when `seed` is set
#[must_use]
pub fn source_from_seed(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..32 {
            assert!((a.next_f32() - b.next_f32()).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = SeededRandom::new(1);
        for _ in 0..500 {
            let v = rng.range(2000.0, 6000.0);
            assert!((2000.0..6000.0).contains(&v));
        }
    }

    #[test]
    fn test_pick_index_stays_in_bounds() {
        let mut rng = ScriptedRandom::new(vec![0.0, 0.34, 0.67, 0.999_9]);
        assert_eq!(rng.pick_index(3), 0);
        assert_eq!(rng.pick_index(3), 1);
        assert_eq!(rng.pick_index(3), 2);
        assert_eq!(rng.pick_index(3), 2);
        assert_eq!(rng.pick_index(0), 0);
    }

    #[test]
    fn test_scripted_cycles_and_clamps() {
        let mut rng = ScriptedRandom::new(vec![0.25, 1.0]);
        assert!((rng.next_f32() - 0.25).abs() < f32::EPSILON);
        assert!(rng.next_f32() < 1.0);
        assert!((rng.next_f32() - 0.25).abs() < f32::EPSILON);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_empty_script_is_zero() {
        let mut rng = ScriptedRandom::new(Vec::new());
        assert!(rng.next_f32().abs() < f32::EPSILON);
    }
}
