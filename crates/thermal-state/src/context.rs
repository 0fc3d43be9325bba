//! Everything a state handler may read or touch during one tick.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Timelike, Utc};
use thermal_core::models::{HvacMode, PreferenceLevel, ThermalConstants, ThermalState};
use thermal_core::traits::{NotificationSender, PersistCallback};
use thermal_core::tracing_setup::events;
use thermal_model::{PassiveThermalModel, StabilityDetector};
use thermal_probe::{AbortReason, ProbeScheduler};

use crate::phase::PhaseData;

/// The `[lower, upper]` band considered acceptable for the current setpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingWindow {
    pub lower: f64,
    pub upper: f64,
}

impl OperatingWindow {
    pub fn around(center: f64, half_width: f64) -> Self {
        Self {
            lower: center - half_width,
            upper: center + half_width,
        }
    }

    pub fn contains(&self, temperature: f64) -> bool {
        temperature >= self.lower && temperature <= self.upper
    }

    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Explicit handler context, built fresh by the manager for every call.
///
/// Tick inputs are copies. The model, phase arena, and stability detector
/// are borrowed mutably; collaborators are optional shared borrows.
pub struct ThermalContext<'a> {
    pub now: DateTime<Utc>,
    pub current_temp: Option<f64>,
    pub outdoor_temp: Option<f64>,
    pub hvac_mode: HvacMode,
    pub setpoint: Option<f64>,
    /// State active before the most recent transition.
    pub previous_state: Option<ThermalState>,

    pub constants: &'a ThermalConstants,
    pub preference_level: PreferenceLevel,
    pub calibration_hour: Option<u32>,
    pub utc_offset: Option<FixedOffset>,
    pub wrapped_entity_id: Option<&'a str>,

    pub model: &'a mut PassiveThermalModel,
    pub phases: &'a mut PhaseData,
    pub stability: &'a mut StabilityDetector,

    pub scheduler: Option<&'a ProbeScheduler>,
    pub notifier: Option<&'a dyn NotificationSender>,
    pub persist: Option<&'a PersistCallback>,

    /// Abort condition polled for a running probe this tick.
    pub probe_abort: Option<AbortReason>,
    /// Whether the automatic-probe interval gate is open.
    pub auto_probe_allowed: bool,
    pub auto_probe_confidence_threshold: f64,
}

impl ThermalContext<'_> {
    /// Send a notification, logging and dropping any delivery failure.
    pub fn notify(&self, title: &str, message: &str) {
        let Some(notifier) = self.notifier else {
            return;
        };
        if let Err(err) = notifier.send(title, message, false, None) {
            events::notification_failed(title, &err.to_string());
        }
    }

    /// Ask the collaborator to schedule a save.
    pub fn persist(&self) {
        if let Some(callback) = self.persist {
            callback();
        }
    }

    /// Local date and hour used for the daily calibration slot.
    pub fn local_date_hour(&self) -> (NaiveDate, u32) {
        match self.utc_offset {
            Some(offset) => {
                let local = self.now.with_timezone(&offset);
                (local.date_naive(), local.hour())
            }
            None => {
                let local = self.now.with_timezone(&Local);
                (local.date_naive(), local.hour())
            }
        }
    }

    /// Display name of the controlled entity for notification text.
    pub fn entity_label(&self) -> &str {
        self.wrapped_entity_id.unwrap_or("thermostat")
    }
}
