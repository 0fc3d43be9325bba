use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed (or salvaged) calibration probe.
///
/// Built once by whoever finished the measurement, then handed to the model.
/// Once it sits in the probe history it is never changed again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Measured thermal time constant in minutes.
    pub tau_value: f64,
    /// Confidence in the measurement, 0.0 – 1.0.
    pub confidence: f64,
    /// Probe duration in seconds.
    pub duration: i64,
    /// Curve-fit quality (R²), 0.0 – 1.0.
    pub fit_quality: f64,
    /// Whether the probe ended early and was salvaged.
    pub aborted: bool,
    /// When the probe finished.
    pub timestamp: DateTime<Utc>,
    /// Outdoor temperature during the probe. Missing on legacy records.
    #[serde(default)]
    pub outdoor_temp: Option<f64>,
    /// Direction the measurement applies to. `None` applies to both.
    #[serde(default)]
    pub is_cooling: Option<bool>,
    /// Learned from a natural drift event rather than a deliberate probe.
    #[serde(default)]
    pub passive: bool,
}

impl ProbeResult {
    /// Create a probe result stamped with the current time.
    pub fn new(tau_value: f64, confidence: f64, duration: i64, fit_quality: f64, aborted: bool) -> Self {
        Self {
            tau_value,
            confidence,
            duration,
            fit_quality,
            aborted,
            timestamp: Utc::now(),
            outdoor_temp: None,
            is_cooling: None,
            passive: false,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_outdoor_temp(mut self, outdoor_temp: Option<f64>) -> Self {
        self.outdoor_temp = outdoor_temp;
        self
    }

    /// Tag the measurement with its direction.
    pub fn with_direction(mut self, is_cooling: bool) -> Self {
        self.is_cooling = Some(is_cooling);
        self
    }

    /// Mark as learned passively. Passive results feed the taus but not the probe intervals.
    pub fn as_passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// Whether this probe contributes to the tau for the given direction.
    pub fn applies_to(&self, is_cooling: bool) -> bool {
        self.is_cooling.map_or(true, |c| c == is_cooling)
    }

    /// Structural validity: positive finite tau and duration, unit-range scores.
    pub fn is_valid(&self) -> bool {
        self.tau_value.is_finite()
            && self.tau_value > 0.0
            && self.duration > 0
            && (0.0..=1.0).contains(&self.confidence)
            && (0.0..=1.0).contains(&self.fit_quality)
    }
}
