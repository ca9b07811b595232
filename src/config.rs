// config.rs
use crate::error::{Error, Result};
use crate::global_variables::{
    ARRIVAL_INTERVAL_MS, CROSSING_BASE_MS, CROSSING_JITTER_MS, GREEN_MS, VEHICLE_COUNT_MAX,
    VEHICLE_COUNT_MIN, YELLOW_MS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timing constants and vehicle count limits for one run.
///
/// Every field has a default, so a config file only needs the values it overrides:
///
/// ```json
/// { "green_ms": 2000, "arrival_interval_ms": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub green_ms: u64,
    pub yellow_ms: u64,
    pub crossing_base_ms: u64,
    /// Upper bound (exclusive) of the random extra crossing time. Zero disables jitter.
    pub crossing_jitter_ms: u64,
    pub arrival_interval_ms: u64,
    pub min_vehicles: u32,
    pub max_vehicles: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            green_ms: GREEN_MS,
            yellow_ms: YELLOW_MS,
            crossing_base_ms: CROSSING_BASE_MS,
            crossing_jitter_ms: CROSSING_JITTER_MS,
            arrival_interval_ms: ARRIVAL_INTERVAL_MS,
            min_vehicles: VEHICLE_COUNT_MIN,
            max_vehicles: VEHICLE_COUNT_MAX,
        }
    }
}

impl SimulationConfig {
    /// Loads a config file, falling back to defaults for missing fields.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("green_ms", self.green_ms),
            ("yellow_ms", self.yellow_ms),
            ("crossing_base_ms", self.crossing_base_ms),
            ("arrival_interval_ms", self.arrival_interval_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, value)| *value == 0) {
            return Err(Error::InvalidConfig(format!("{name} must be positive")));
        }
        // Jitter is drawn in microseconds.
        if self.crossing_jitter_ms.checked_mul(1_000).is_none() {
            return Err(Error::InvalidConfig(format!(
                "crossing_jitter_ms ({}) is too large",
                self.crossing_jitter_ms
            )));
        }
        if self.min_vehicles == 0 {
            return Err(Error::InvalidConfig("min_vehicles must be positive".into()));
        }
        if self.min_vehicles > self.max_vehicles {
            return Err(Error::InvalidConfig(format!(
                "min_vehicles ({}) exceeds max_vehicles ({})",
                self.min_vehicles, self.max_vehicles
            )));
        }
        Ok(())
    }

    pub fn green(&self) -> Duration {
        Duration::from_millis(self.green_ms)
    }

    pub fn yellow(&self) -> Duration {
        Duration::from_millis(self.yellow_ms)
    }

    pub fn crossing_base(&self) -> Duration {
        Duration::from_millis(self.crossing_base_ms)
    }

    pub fn arrival_interval(&self) -> Duration {
        Duration::from_millis(self.arrival_interval_ms)
    }
}
