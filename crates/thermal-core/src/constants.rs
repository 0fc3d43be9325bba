/// Thermal core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of probes kept in the in-memory history.
pub const MAX_PROBE_HISTORY: usize = 75;

/// Number of most-recent probes written into a persisted snapshot.
pub const PERSISTED_PROBE_LIMIT: usize = 5;

/// Snapshot document version.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Snapshot metadata schema version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Daily multiplicative decay applied to probe weights (half-life ~34.3 days).
pub const DECAY_RATE_PER_DAY: f64 = 0.98;

/// Probe count at which model confidence saturates at 1.0.
pub const CONFIDENCE_SAMPLE_TARGET: usize = 30;

/// Longest phase duration accepted from configuration (one year, seconds).
pub const MAX_PHASE_DURATION_SECS: i64 = 365 * 86_400;

/// Tau values at or above this (minutes) are treated as corrupt on restore.
pub const MAX_PLAUSIBLE_TAU: f64 = 1000.0;

/// Static outdoor temperature bin boundaries (°C).
pub const DEFAULT_OUTDOOR_TEMP_BINS: [f64; 5] = [-10.0, 0.0, 10.0, 20.0, 30.0];

/// Minimum history size before adaptive bins replace the static ones.
pub const ADAPTIVE_BINS_MIN_SAMPLES: usize = 50;

/// Minimum spread between consecutive adaptive bin boundaries (°C).
pub const ADAPTIVE_BINS_MIN_SPREAD: f64 = 5.0;

/// Valid range for any temperature bin boundary (°C).
pub const TEMPERATURE_BIN_RANGE: (f64, f64) = (-40.0, 60.0);

/// Confidence multiplier applied to salvaged partial probes.
pub const PARTIAL_PROBE_CONFIDENCE_FACTOR: f64 = 0.7;

/// Target-temperature change during a probe that counts as a manual override (°C).
pub const MANUAL_TARGET_CHANGE_THRESHOLD: f64 = 0.5;

/// Entity states that mean "no signal".
pub const UNAVAILABLE_STATES: [&str; 2] = ["unknown", "unavailable"];
