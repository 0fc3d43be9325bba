use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::LearningProfile;

/// Probe scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Learning profile preset. Default: balanced.
    pub profile: LearningProfile,
    /// Presence (person/device tracker) entity. Authoritative when known.
    pub presence_entity_id: Option<String>,
    /// Calendar entity; an active event means "at work".
    pub calendar_entity_id: Option<String>,
    /// Boolean helper the user flips to allow probing.
    pub manual_override_entity_id: Option<String>,
    /// Weather entity providing the outdoor temperature.
    pub weather_entity_id: Option<String>,
    /// Wrapped climate entity, watched for faults during a probe.
    pub hvac_entity_id: Option<String>,
    /// Quiet hours start (local time). Default: 22:00.
    pub quiet_hours_start: NaiveTime,
    /// Quiet hours end (local time, exclusive). Default: 07:00.
    pub quiet_hours_end: NaiveTime,
    /// Outdoor change during a probe that aborts it (°C). Default: 5.0.
    pub outdoor_temp_change_threshold: f64,
    /// Shortest aborted probe worth keeping (minutes). Default: 15.
    pub min_probe_duration_minutes: u32,
    /// Whether presence gates probing at all. Default: true.
    pub presence_detection_enabled: bool,
    /// Derive bins from history once enough samples exist. Default: true.
    pub adaptive_bins_enabled: bool,
    /// Fixed UTC offset for quiet-hours evaluation. `None` uses the host's local zone.
    pub utc_offset_minutes: Option<i32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            profile: LearningProfile::default(),
            presence_entity_id: None,
            calendar_entity_id: None,
            manual_override_entity_id: None,
            weather_entity_id: None,
            hvac_entity_id: None,
            quiet_hours_start: defaults::quiet_hours_start(),
            quiet_hours_end: defaults::quiet_hours_end(),
            outdoor_temp_change_threshold: defaults::DEFAULT_OUTDOOR_TEMP_CHANGE_THRESHOLD,
            min_probe_duration_minutes: defaults::DEFAULT_MIN_PROBE_DURATION_MINUTES,
            presence_detection_enabled: true,
            adaptive_bins_enabled: true,
            utc_offset_minutes: None,
        }
    }
}
