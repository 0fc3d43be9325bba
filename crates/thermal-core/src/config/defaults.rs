// Single source of truth for all default values.

use chrono::NaiveTime;

// --- Thermal constants ---
pub const DEFAULT_TAU_COOLING: f64 = 90.0; // minutes
pub const DEFAULT_TAU_WARMING: f64 = 150.0; // minutes
pub const DEFAULT_MIN_OFF_TIME_SECS: i64 = 600;
pub const DEFAULT_MIN_ON_TIME_SECS: i64 = 300;
pub const DEFAULT_PRIMING_DURATION_SECS: i64 = 86_400; // 24 hours
pub const DEFAULT_RECOVERY_DURATION_SECS: i64 = 1_800; // 30 minutes
pub const DEFAULT_PROBE_MIN_DURATION_SECS: i64 = 1_800; // 30 minutes
pub const DEFAULT_PROBE_MAX_DURATION_SECS: i64 = 10_800; // 3 hours
pub const DEFAULT_CALIBRATING_DURATION_SECS: i64 = 3_600; // 1 hour

// --- Scheduler ---
pub const DEFAULT_QUIET_HOURS_START_HOUR: u32 = 22;
pub const DEFAULT_QUIET_HOURS_END_HOUR: u32 = 7;
pub const DEFAULT_OUTDOOR_TEMP_CHANGE_THRESHOLD: f64 = 5.0; // °C
pub const DEFAULT_MIN_PROBE_DURATION_MINUTES: u32 = 15;

// --- Manager ---
pub const DEFAULT_CALIBRATION_HOUR: u32 = 2;
pub const DEFAULT_AUTO_PROBE_CONFIDENCE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_AUTO_PROBE_MIN_INTERVAL_HOURS: u32 = 24;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "thermal=info";
pub const LOG_ENV_VAR: &str = "THERMAL_LOG";

pub fn quiet_hours_start() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_QUIET_HOURS_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn quiet_hours_end() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_QUIET_HOURS_END_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}
