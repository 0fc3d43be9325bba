#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use thermal_core::config::ManagerConfig;
use thermal_core::models::{HvacMode, ThermalConstants};
use thermal_state::ThermalManager;

pub const SETPOINT: f64 = 21.0;

/// Short phases so scenarios fit in a few ticks.
pub fn constants() -> ThermalConstants {
    ThermalConstants {
        priming_duration: 3_600,
        recovery_duration: 600,
        probe_min_duration: 1_800,
        probe_max_duration: 7_200,
        calibrating_duration: 600,
        ..Default::default()
    }
}

/// Automatic probes and daily calibration switched off.
pub fn quiet_config() -> ManagerConfig {
    ManagerConfig {
        auto_probe_confidence_threshold: 0.0,
        calibration_hour: None,
        utc_offset_minutes: Some(0),
        ..Default::default()
    }
}

pub fn manager() -> ThermalManager {
    let mut manager = ThermalManager::new(constants()).with_manager_config(quiet_config());
    manager.set_setpoint(Some(SETPOINT));
    manager
}

pub fn minutes(start: DateTime<Utc>, m: i64) -> DateTime<Utc> {
    start + Duration::minutes(m)
}

/// `15 + 6·e^(-t/tau)` sampled at `t` minutes.
pub fn decay(t: f64, tau: f64) -> f64 {
    15.0 + 6.0 * (-t / tau).exp()
}

pub fn tick(manager: &mut ThermalManager, now: DateTime<Utc>, temp: f64) {
    manager.update_state_at(Some(temp), None, HvacMode::Off, now);
}
