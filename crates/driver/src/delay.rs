//! Randomized pre-reset delay
//!
//! After `run` the host waits `base + U[0, jitter)` seconds before pulling
//! the reset line, so that successive cycles interrupt the device's write
//! loop at different points.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use resilience_core::{DelayError, DelayParams};
use std::time::Duration;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Blocking delay primitive
pub trait Sleeper {
    /// Block the caller for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSleeper;

impl Sleeper for NoopSleeper {
    fn sleep(&mut self, _duration: Duration) {}
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Source of pre-reset delays
///
/// Sampling works on whole nanoseconds so the upper bound stays exclusive
/// after conversion to [`Duration`].
#[derive(Debug, Clone)]
pub struct ResetDelay {
    base_nanos: u64,
    jitter_nanos: u64,
    rng: StdRng,
}

impl ResetDelay {
    /// Delay source seeded from OS entropy.
    pub fn new(params: DelayParams) -> Result<Self, DelayError> {
        Self::with_rng(params, StdRng::from_entropy())
    }

    /// Reproducible delay source.
    pub fn seeded(params: DelayParams, seed: u64) -> Result<Self, DelayError> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: DelayParams, rng: StdRng) -> Result<Self, DelayError> {
        params.validate()?;
        Ok(ResetDelay {
            base_nanos: (params.base_secs * NANOS_PER_SEC).round() as u64,
            jitter_nanos: (params.jitter_secs * NANOS_PER_SEC).round() as u64,
            rng,
        })
    }

    /// Shortest delay this source produces.
    pub fn min(&self) -> Duration {
        Duration::from_nanos(self.base_nanos)
    }

    /// Exclusive upper bound (equal to `min` without jitter).
    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.base_nanos.saturating_add(self.jitter_nanos))
    }

    /// Draw the next delay.
    pub fn sample(&mut self) -> Duration {
        let extra = if self.jitter_nanos == 0 {
            0
        } else {
            self.rng.gen_range(0..self.jitter_nanos)
        };
        Duration::from_nanos(self.base_nanos.saturating_add(extra))
    }
}
