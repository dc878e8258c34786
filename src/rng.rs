//! Randomness seam. Channel randomization and image assignment draw from a
//! `RandomSource` so tests can swap in a seeded or scripted one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in `0..max_exclusive`. Returns 0 when `max_exclusive` is 0.
    fn next_int(&mut self, max_exclusive: u32) -> u32;

    /// Uniformly chosen element of `items`, `None` if empty.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
        items.get(self.next_int(len) as usize)
    }
}

/// Production source backed by `StdRng`.
pub struct GameRng(StdRng);

impl GameRng {
    /// Seeded from OS / browser entropy (`getrandom`).
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for GameRng {
    fn next_int(&mut self, max_exclusive: u32) -> u32 {
        if max_exclusive == 0 {
            return 0;
        }
        self.0.gen_range(0..max_exclusive)
    }
}
