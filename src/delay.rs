//! # Random delay ranges.
//!
//! [`DelayRange`] describes an inclusive `[min, max]` window from which service
//! durations and arrival intervals are drawn. Sampling is uniform at nanosecond
//! resolution, so every sample lies inside the range.
//!
//! - `min == max` → constant delay (no randomness)
//! - `min > max`  → rejected by [`DelayRange::validate`]

use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::error::RuntimeError;

/// Inclusive range of delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct DelayRange {
    /// Shortest possible delay.
    #[serde(with = "humantime_serde", default)]
    pub min: Duration,
    /// Longest possible delay.
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl DelayRange {
    /// Creates a range `[min, max]`.
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Range `[0, max]`.
    pub const fn up_to(max: Duration) -> Self {
        Self::new(Duration::ZERO, max)
    }

    /// Degenerate range that always yields `d`.
    pub const fn fixed(d: Duration) -> Self {
        Self::new(d, d)
    }

    /// Draws a delay uniformly from the range.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        let span = u64::try_from((self.max - self.min).as_nanos()).unwrap_or(u64::MAX);
        let mut rng = rand::rng();
        self.min + Duration::from_nanos(rng.random_range(0..=span))
    }

    /// Checks that `min <= max`.
    pub fn validate(&self, field: &'static str) -> Result<(), RuntimeError> {
        if self.min > self.max {
            return Err(RuntimeError::InvalidConfig {
                field,
                reason: format!("min {:?} exceeds max {:?}", self.min, self.max),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_range_is_constant() {
        let range = DelayRange::fixed(Duration::from_millis(42));
        for _ in 0..16 {
            assert_eq!(range.sample(), Duration::from_millis(42));
        }
    }

    #[test]
    fn test_sample_within_bounds() {
        let range = DelayRange::new(Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..256 {
            let d = range.sample();
            assert!(d >= range.min && d <= range.max, "{d:?} out of {range:?}");
        }
    }

    #[test]
    fn test_sub_millisecond_bounds_hold() {
        let range = DelayRange::new(Duration::from_micros(1500), Duration::from_micros(2100));
        for _ in 0..512 {
            let d = range.sample();
            assert!(d >= range.min && d <= range.max, "{d:?} out of {range:?}");
        }
    }

    #[test]
    fn test_zero_range() {
        assert_eq!(DelayRange::up_to(Duration::ZERO).sample(), Duration::ZERO);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let range = DelayRange::new(Duration::from_secs(2), Duration::from_secs(1));
        let err = range.validate("service").unwrap_err();
        assert_eq!(err.as_label(), "runtime_invalid_config");
        assert!(err.to_string().contains("service"));
    }
}
