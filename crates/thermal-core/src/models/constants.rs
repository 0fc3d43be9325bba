use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::constants::MAX_PHASE_DURATION_SECS;

/// Tunable time constants and phase durations.
///
/// Taus are in minutes, durations in seconds. Set once from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConstants {
    /// Cooling time constant (minutes). Default: 90.
    pub tau_cooling: f64,
    /// Warming time constant (minutes). Default: 150.
    pub tau_warming: f64,
    /// Minimum HVAC off time (seconds). Default: 600.
    pub min_off_time: i64,
    /// Minimum HVAC on time (seconds). Default: 300.
    pub min_on_time: i64,
    /// Length of the priming phase (seconds). Default: 86400.
    pub priming_duration: i64,
    /// Length of a recovery ramp (seconds). Default: 1800.
    pub recovery_duration: i64,
    /// Minimum probe length before analysis (seconds). Default: 1800.
    pub probe_min_duration: i64,
    /// Probe length after which an unproductive probe is abandoned (seconds). Default: 10800.
    pub probe_max_duration: i64,
    /// Length of the calibration window (seconds). Default: 3600.
    pub calibrating_duration: i64,
}

impl ThermalConstants {
    pub fn priming(&self) -> Duration {
        clamped(self.priming_duration)
    }

    pub fn recovery(&self) -> Duration {
        clamped(self.recovery_duration)
    }

    pub fn probe_min(&self) -> Duration {
        clamped(self.probe_min_duration)
    }

    pub fn probe_max(&self) -> Duration {
        clamped(self.probe_max_duration)
    }

    pub fn calibrating(&self) -> Duration {
        clamped(self.calibrating_duration)
    }
}

/// Unvalidated values are clamped into `0..=MAX_PHASE_DURATION_SECS`.
fn clamped(secs: i64) -> Duration {
    Duration::seconds(secs.clamp(0, MAX_PHASE_DURATION_SECS))
}

impl Default for ThermalConstants {
    fn default() -> Self {
        Self {
            tau_cooling: defaults::DEFAULT_TAU_COOLING,
            tau_warming: defaults::DEFAULT_TAU_WARMING,
            min_off_time: defaults::DEFAULT_MIN_OFF_TIME_SECS,
            min_on_time: defaults::DEFAULT_MIN_ON_TIME_SECS,
            priming_duration: defaults::DEFAULT_PRIMING_DURATION_SECS,
            recovery_duration: defaults::DEFAULT_RECOVERY_DURATION_SECS,
            probe_min_duration: defaults::DEFAULT_PROBE_MIN_DURATION_SECS,
            probe_max_duration: defaults::DEFAULT_PROBE_MAX_DURATION_SECS,
            calibrating_duration: defaults::DEFAULT_CALIBRATING_DURATION_SECS,
        }
    }
}
