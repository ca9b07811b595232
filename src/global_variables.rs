// Vehicle count limits (inclusive)
pub const VEHICLE_COUNT_MIN: u32 = 10;
pub const VEHICLE_COUNT_MAX: u32 = 500;

// Light timings (milliseconds)
pub const GREEN_MS: u64 = 4_000;
pub const YELLOW_MS: u64 = 1_000;

// Vehicle timings (milliseconds)
pub const CROSSING_BASE_MS: u64 = 1_000;
pub const CROSSING_JITTER_MS: u64 = 5;
pub const ARRIVAL_INTERVAL_MS: u64 = 2_000;
