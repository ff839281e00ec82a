//! Uniformly sampled delay ranges.

use rand::{Rng, RngCore};
use std::time::Duration;

/// Half-open range of delays `[min, max)` sampled uniformly at millisecond
/// resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    /// Range from millisecond bounds.
    #[must_use]
    pub const fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    /// Whether the range contains at least one value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min < self.max
    }

    /// Whether `delay` falls inside `[min, max)`.
    #[must_use]
    pub fn contains(&self, delay: Duration) -> bool {
        delay >= self.min && delay < self.max
    }

    /// Draw one delay. A degenerate range yields `min`.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(rng.gen_range(min..max))
    }
}
