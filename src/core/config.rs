//! # Shop configuration.
//!
//! Provides [`Config`] centralized settings for a barbershop run.
//!
//! Config is used in two ways:
//! 1. **Shop creation**: `Barbershop::builder(config)` (core sizes: workers, capacity)
//! 2. **Simulation**: `Simulation::new(config)` (operating hours and random delays)
//!
//! ## Sources
//! - [`Config::default`] mirrors a small shop: 2 barbers, 5 chairs, open 10s.
//! - [`Config::from_yaml_file`] loads a YAML document; missing keys keep defaults.
//!
//! ```yaml
//! workers: 3
//! capacity: 4
//! operating: 30s
//! service: { min: 100ms, max: 800ms }
//! arrival: { max: 1s }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::delay::DelayRange;
use crate::error::RuntimeError;

/// Configuration for a barbershop run.
///
/// ## Field semantics
/// - `workers`: Number of barbers (must be `> 0`)
/// - `capacity`: Number of waiting chairs (must be `> 0`)
/// - `operating`: How long the shop stays open before closing starts (`0s` = close immediately)
/// - `service`: Range for simulated service durations
/// - `arrival`: Range for intervals between arrivals
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of concurrent barbers.
    pub workers: usize,

    /// Number of chairs in the waiting area.
    pub capacity: usize,

    /// Operating duration; closing starts once it elapses.
    #[serde(with = "humantime_serde")]
    pub operating: Duration,

    /// Service duration range (used by the default `Haircut` service).
    pub service: DelayRange,

    /// Interval between consecutive arrivals (used by the arrival generator).
    pub arrival: DelayRange,
}

impl Config {
    /// Reads a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| RuntimeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks every field; returns the first violation.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.workers == 0 {
            return Err(RuntimeError::InvalidConfig {
                field: "workers",
                reason: "at least one barber is required".into(),
            });
        }
        if self.capacity == 0 {
            return Err(RuntimeError::InvalidConfig {
                field: "capacity",
                reason: "at least one chair is required".into(),
            });
        }
        self.service.validate("service")?;
        self.arrival.validate("arrival")?;
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `workers = 2`
    /// - `capacity = 5`
    /// - `operating = 10s`
    /// - `service = 0..500ms`
    /// - `arrival = 0..1000ms`
    fn default() -> Self {
        Self {
            workers: 2,
            capacity: 5,
            operating: Duration::from_secs(10),
            service: DelayRange::up_to(Duration::from_millis(500)),
            arrival: DelayRange::up_to(Duration::from_millis(1000)),
        }
    }
}
