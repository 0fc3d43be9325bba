use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::constants::{DEFAULT_OUTDOOR_TEMP_BINS, TEMPERATURE_BIN_RANGE};
use crate::errors::ConfigError;

/// User-overridable scheduler parameters.
///
/// Validated as a whole before anything is applied; see [`AdvancedSettings::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    /// 1 – 168 hours.
    pub min_probe_interval_hours: u32,
    /// 1 – 30 days.
    pub max_probe_interval_days: u32,
    pub quiet_hours_enabled: bool,
    pub quiet_hours_start: NaiveTime,
    pub quiet_hours_end: NaiveTime,
    /// 0.0 – 1.0.
    pub information_gain_threshold: f64,
    /// Ascending, each within -40 – 60 °C.
    pub temperature_bins: Vec<f64>,
    pub presence_detection_enabled: bool,
    /// 1 – 20 °C.
    pub outdoor_temp_change_threshold: f64,
    /// 5 – 120 minutes.
    pub min_probe_duration_minutes: u32,
    pub adaptive_bins_enabled: bool,
}

impl AdvancedSettings {
    /// Check every range and consistency rule, collecting all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if !(1..=168).contains(&self.min_probe_interval_hours) {
            violations.push(format!(
                "min_probe_interval_hours must be within 1..=168, got {}",
                self.min_probe_interval_hours
            ));
        }
        if !(1..=30).contains(&self.max_probe_interval_days) {
            violations.push(format!(
                "max_probe_interval_days must be within 1..=30, got {}",
                self.max_probe_interval_days
            ));
        }
        if u64::from(self.min_probe_interval_hours) >= u64::from(self.max_probe_interval_days) * 24 {
            violations.push(format!(
                "min_probe_interval_hours ({}) must be shorter than max_probe_interval_days ({}d)",
                self.min_probe_interval_hours, self.max_probe_interval_days
            ));
        }
        if self.quiet_hours_start == self.quiet_hours_end {
            violations.push(format!(
                "quiet_hours_start and quiet_hours_end must differ, both are {}",
                self.quiet_hours_start
            ));
        }
        if !(0.0..=1.0).contains(&self.information_gain_threshold) {
            violations.push(format!(
                "information_gain_threshold must be within 0.0..=1.0, got {}",
                self.information_gain_threshold
            ));
        }
        if self.temperature_bins.is_empty() {
            violations.push("temperature_bins must not be empty".to_string());
        }
        let (lo, hi) = TEMPERATURE_BIN_RANGE;
        if let Some(bad) = self
            .temperature_bins
            .iter()
            .find(|b| !b.is_finite() || **b < lo || **b > hi)
        {
            violations.push(format!(
                "temperature_bins values must be within {lo}..={hi}, got {bad}"
            ));
        }
        if self.temperature_bins.windows(2).any(|w| w[0] >= w[1]) {
            violations.push("temperature_bins must be sorted in strictly ascending order".to_string());
        }
        if !(1.0..=20.0).contains(&self.outdoor_temp_change_threshold) {
            violations.push(format!(
                "outdoor_temp_change_threshold must be within 1.0..=20.0, got {}",
                self.outdoor_temp_change_threshold
            ));
        }
        if !(5..=120).contains(&self.min_probe_duration_minutes) {
            violations.push(format!(
                "min_probe_duration_minutes must be within 5..=120, got {}",
                self.min_probe_duration_minutes
            ));
        }

        match ConfigError::from_violations(violations) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            min_probe_interval_hours: 24,
            max_probe_interval_days: 7,
            quiet_hours_enabled: true,
            quiet_hours_start: defaults::quiet_hours_start(),
            quiet_hours_end: defaults::quiet_hours_end(),
            information_gain_threshold: 0.5,
            temperature_bins: DEFAULT_OUTDOOR_TEMP_BINS.to_vec(),
            presence_detection_enabled: true,
            outdoor_temp_change_threshold: defaults::DEFAULT_OUTDOOR_TEMP_CHANGE_THRESHOLD,
            min_probe_duration_minutes: defaults::DEFAULT_MIN_PROBE_DURATION_MINUTES,
            adaptive_bins_enabled: true,
        }
    }
}
