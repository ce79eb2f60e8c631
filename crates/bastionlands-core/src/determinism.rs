//! Time and randomness abstractions for determinism.
//!
//! In production these wrap the system clock and a real RNG. In tests and
//! replays, fixed or recorded implementations are injected so that dice
//! rolls and timestamps are repeatable.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Roll a single die with `sides` faces.
    fn roll(&mut self, sides: u32) -> u32 {
        self.next_u32_range(1, sides.max(1))
    }

    /// Returns `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

/// Production RNG backed by `StdRng`.
///
/// Seed it explicitly to replay a run; otherwise it is seeded from the OS.
#[derive(Debug)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    /// Creates an RNG with a fixed seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates an RNG seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }
}

impl DeterministicRng for SeededRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }
}
