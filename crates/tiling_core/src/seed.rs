//! Seed sources for shuffling.
//!
//! Every shuffle reseeds a fresh generator from a [`SeedSource`]. The default
//! [`ClockSeed`] reads the high-resolution system clock on each call, so two
//! shuffles landing on the same clock tick produce the same permutation.
//! [`RngSeed`] draws seeds from a seeded ChaCha stream instead and makes a
//! whole session reproducible.

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// Supplies one seed per shuffle.
pub trait SeedSource: std::fmt::Debug {
    /// Returns the seed for the next shuffle.
    fn next_seed(&mut self) -> u64;
}

/// Seeds from the wall clock in nanoseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockSeed;

impl SeedSource for ClockSeed {
    fn next_seed(&mut self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default()
    }
}

/// Deterministic seeds drawn from a ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct RngSeed {
    inner: ChaCha8Rng,
}

impl RngSeed {
    /// Creates a seed stream from a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl SeedSource for RngSeed {
    fn next_seed(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

/// Shuffles a slice in place with a uniformly random permutation.
pub fn shuffle_with<T>(items: &mut [T], seeds: &mut dyn SeedSource) {
    let seed = seeds.next_seed();
    trace!(seed, len = items.len(), "Shuffling");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}
