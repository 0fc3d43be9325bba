pub mod defaults;
mod manager_config;
mod scheduler_config;

pub use manager_config::ManagerConfig;
pub use scheduler_config::SchedulerConfig;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PHASE_DURATION_SECS;
use crate::errors::ConfigError;
use crate::models::ThermalConstants;

/// UTC+14 / UTC-12 fit comfortably inside this.
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Top-level configuration, one section per subsystem.
///
/// Every section is optional in the source TOML; missing keys take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    pub constants: ThermalConstants,
    pub scheduler: SchedulerConfig,
    pub manager: ManagerConfig,
}

impl ThermalConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Sanity checks that TOML typing alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();
        let c = &self.constants;

        for (name, tau) in [("tau_cooling", c.tau_cooling), ("tau_warming", c.tau_warming)] {
            if !tau.is_finite() || tau <= 0.0 {
                violations.push(format!("constants.{name} must be positive, got {tau}"));
            }
        }
        for (name, secs) in [
            ("min_off_time", c.min_off_time),
            ("min_on_time", c.min_on_time),
            ("priming_duration", c.priming_duration),
            ("recovery_duration", c.recovery_duration),
            ("probe_min_duration", c.probe_min_duration),
            ("probe_max_duration", c.probe_max_duration),
            ("calibrating_duration", c.calibrating_duration),
        ] {
            if secs < 0 {
                violations.push(format!("constants.{name} must not be negative, got {secs}"));
            } else if secs > MAX_PHASE_DURATION_SECS {
                violations.push(format!(
                    "constants.{name} must be at most {MAX_PHASE_DURATION_SECS} seconds, got {secs}"
                ));
            }
        }
        if c.probe_max_duration < c.probe_min_duration {
            violations.push("constants.probe_max_duration must not be shorter than probe_min_duration".to_string());
        }
        if self.scheduler.quiet_hours_start == self.scheduler.quiet_hours_end {
            violations.push("scheduler.quiet_hours_start and quiet_hours_end must differ".to_string());
        }
        for (name, offset) in [
            ("scheduler.utc_offset_minutes", self.scheduler.utc_offset_minutes),
            ("manager.utc_offset_minutes", self.manager.utc_offset_minutes),
        ] {
            if let Some(minutes) = offset.filter(|m| m.abs() > MAX_UTC_OFFSET_MINUTES) {
                violations.push(format!("{name} must be within ±{MAX_UTC_OFFSET_MINUTES}, got {minutes}"));
            }
        }
        if let Some(hour) = self.manager.calibration_hour {
            if hour > 23 {
                violations.push(format!("manager.calibration_hour must be within 0..=23, got {hour}"));
            }
        }

        match ConfigError::from_violations(violations) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
