use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::PreferenceLevel;

/// State machine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Comfort preference driving the operating window. Default: balanced.
    pub preference_level: PreferenceLevel,
    /// Local hour at which the daily calibration may run. `None` disables it. Default: 2.
    pub calibration_hour: Option<u32>,
    /// Climate entity this manager controls.
    pub wrapped_entity_id: Option<String>,
    /// Model confidence below which automatic probes are allowed. Default: 0.3.
    pub auto_probe_confidence_threshold: f64,
    /// Minimum spacing of automatic probes (hours). Default: 24.
    pub auto_probe_min_interval_hours: u32,
    /// Fixed offset for the calibration hour. `None` uses the host's local zone.
    pub utc_offset_minutes: Option<i32>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            preference_level: PreferenceLevel::default(),
            calibration_hour: Some(defaults::DEFAULT_CALIBRATION_HOUR),
            wrapped_entity_id: None,
            auto_probe_confidence_threshold: defaults::DEFAULT_AUTO_PROBE_CONFIDENCE_THRESHOLD,
            auto_probe_min_interval_hours: defaults::DEFAULT_AUTO_PROBE_MIN_INTERVAL_HOURS,
            utc_offset_minutes: None,
        }
    }
}
