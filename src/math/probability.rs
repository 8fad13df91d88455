//! Seedable random selection used by every stochastic pipeline stage

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random selector for reproducible stochastic choices
///
/// Each generation request owns its selector, so boards produced from the
/// same seed and configuration are identical.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Return true with the given probability
    ///
    /// Probabilities outside `[0, 1]` are clamped.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    /// Uniform index into a collection of `len` elements, `None` when empty
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Uniform value in `low..=high`; returns `low` for an empty or inverted range
    pub fn level_in(&mut self, low: u8, high: u8) -> u8 {
        if low >= high {
            low
        } else {
            self.rng.random_range(low..=high)
        }
    }

    /// Pick one element uniformly
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
