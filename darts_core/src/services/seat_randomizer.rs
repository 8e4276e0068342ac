//! Seat and seed randomization.
//!
//! Match seating and tournament seeding are the only two places the core
//! draws random numbers. Both go through [`RandomSource`] so tests can swap
//! in a seeded or fixed ordering.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::sync::Mutex;

/// Source of random orderings.
pub trait RandomSource: Send + Sync {
    /// Return a permutation of `0..len`.
    ///
    /// Element `i` of the result is the index of the item that moves into
    /// position `i`.
    fn permutation(&self, len: usize) -> Vec<usize>;
}

/// Reorder `items` using a permutation drawn from `source`.
///
/// # Arguments
///
/// * `source` - Random source producing the permutation
/// * `items` - Items to reorder
///
/// # Returns
///
/// * `Vec<T>` - The same items in permuted order
pub fn shuffle<T>(source: &dyn RandomSource, items: Vec<T>) -> Vec<T> {
    let order = source.permutation(items.len());
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut shuffled = Vec::with_capacity(slots.len());
    for idx in order {
        if let Some(item) = slots.get_mut(idx).and_then(Option::take) {
            shuffled.push(item);
        }
    }
    // A malformed permutation must not lose items.
    shuffled.extend(slots.into_iter().flatten());
    shuffled
}

/// Uniform random permutations backed by a standard RNG.
pub struct SeatRandomizer {
    rng: Mutex<StdRng>,
}

impl SeatRandomizer {
    /// Create a randomizer seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Create a reproducible randomizer
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SeatRandomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SeatRandomizer {
    fn permutation(&self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        order.shuffle(&mut *rng);
        order
    }
}

/// Keeps the input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShuffle;

impl RandomSource for NoShuffle {
    fn permutation(&self, len: usize) -> Vec<usize> {
        (0..len).collect()
    }
}

/// Replays a fixed permutation, falling back to identity for lengths it
/// doesn't cover.
#[derive(Debug, Clone, Default)]
pub struct FixedPermutation(pub Vec<usize>);

impl RandomSource for FixedPermutation {
    fn permutation(&self, len: usize) -> Vec<usize> {
        if self.0.len() == len {
            self.0.clone()
        } else {
            (0..len).collect()
        }
    }
}
