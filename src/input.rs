// input.rs
use crate::config::SimulationConfig;
use crate::error::{Error, Result};

/// Parses the raw vehicle count argument and checks it against the configured limits.
///
/// Only plain ASCII digits are accepted, so `+12`, `-5` and `1e3` are rejected as
/// malformed rather than out of range.
pub fn parse_vehicle_count(raw: &str, config: &SimulationConfig) -> Result<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidVehicleCount(raw.to_string()));
    }

    let out_of_range = |count: u64| Error::VehicleCountOutOfRange {
        count,
        min: config.min_vehicles,
        max: config.max_vehicles,
    };

    // All digits but too large for u64: certainly above any configured maximum.
    let count: u64 = raw.parse().map_err(|_| out_of_range(u64::MAX))?;
    if count < u64::from(config.min_vehicles) || count > u64::from(config.max_vehicles) {
        return Err(out_of_range(count));
    }

    Ok(count as u32)
}
