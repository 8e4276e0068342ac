//! Collaborators injected into the engine.
//!
//! The core never talks to the outside world directly. Identifiers,
//! timestamps and random orderings all come from the traits in this module:
//! - [`IdGenerator`] for match, player, slot and fixture ids
//! - [`Clock`] for turn and completion timestamps
//! - [`RandomSource`] for match seating and tournament seeding
//!
//! ## Example
//!
//! ```
//! use darts_core::services::{RandomSource, Services};
//!
//! // Reproducible ids, timestamps and shuffles
//! let services = Services::deterministic(42);
//! let order = services.random.permutation(4);
//! assert_eq!(order.len(), 4);
//! ```

pub mod clock;
pub mod ids;
pub mod seat_randomizer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use seat_randomizer::{FixedPermutation, NoShuffle, RandomSource, SeatRandomizer, shuffle};

use std::sync::Arc;

/// Bundle of injected collaborators shared by the engine and managers.
#[derive(Clone)]
pub struct Services {
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
}

impl Services {
    pub fn new(
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self { ids, clock, random }
    }

    /// Sequential ids, a fixed clock and a seeded shuffle.
    pub fn deterministic(seed: u64) -> Self {
        Self::new(
            Arc::new(SequentialIds::default()),
            Arc::new(FixedClock::default()),
            Arc::new(SeatRandomizer::seeded(seed)),
        )
    }

    /// Sequential ids, a fixed clock and no shuffling at all.
    pub fn unshuffled() -> Self {
        Self::new(
            Arc::new(SequentialIds::default()),
            Arc::new(FixedClock::default()),
            Arc::new(NoShuffle),
        )
    }

    /// Replace the random source.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(
            Arc::new(UuidGenerator),
            Arc::new(SystemClock),
            Arc::new(SeatRandomizer::new()),
        )
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
