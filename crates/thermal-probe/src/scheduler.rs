//! ProbeScheduler: the "should a probe run now?" decision engine.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, NaiveTime, Utc};
use thermal_core::config::SchedulerConfig;
use thermal_core::constants::{MANUAL_TARGET_CHANGE_THRESHOLD, PARTIAL_PROBE_CONFIDENCE_FACTOR};
use thermal_core::errors::ThermalResult;
use thermal_core::models::{AdvancedSettings, LearningProfile, ProbeResult, ProfileConfig};
use thermal_core::traits::StateProvider;
use thermal_model::PassiveThermalModel;
use tracing::{debug, info, warn};

use crate::abort::{AbortReason, ProbeWatch};
use crate::binning;
use crate::decision::{DecisionReason, ProbeDecision};
use crate::occupancy::{self, OccupancyEntities, OpportuneCheck};
use crate::quiet_hours::QuietHours;

/// Decides when a calibration probe should run.
///
/// Reads the model's probe history (handed in per call) and the environment
/// through the [`StateProvider`]. Never mutates the model.
pub struct ProbeScheduler {
    config: SchedulerConfig,
    profile_config: ProfileConfig,
    provider: Arc<dyn StateProvider>,
}

impl ProbeScheduler {
    pub fn new(config: SchedulerConfig, provider: Arc<dyn StateProvider>) -> Self {
        let profile_config = ProfileConfig::for_profile(config.profile);
        Self {
            config,
            profile_config,
            provider,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn profile_config(&self) -> &ProfileConfig {
        &self.profile_config
    }

    pub fn quiet_hours(&self) -> QuietHours {
        QuietHours::new(self.config.quiet_hours_start, self.config.quiet_hours_end)
    }

    // --- Decision ---

    /// Binary decision for the current moment.
    pub fn should_probe_now(&self, model: &PassiveThermalModel) -> bool {
        self.evaluate_at(model, Utc::now()).should_probe
    }

    pub fn should_probe_at(&self, model: &PassiveThermalModel, now: DateTime<Utc>) -> bool {
        self.evaluate_at(model, now).should_probe
    }

    /// Full decision with the reason, for diagnostics.
    pub fn evaluate(&self, model: &PassiveThermalModel) -> ProbeDecision {
        self.evaluate_at(model, Utc::now())
    }

    /// Run the checks in order, stopping at the first decisive one.
    pub fn evaluate_at(&self, model: &PassiveThermalModel, now: DateTime<Utc>) -> ProbeDecision {
        let last_probe = model.last_active_probe_time();

        if self.max_interval_exceeded(last_probe, now) {
            info!(last_probe = ?last_probe, "maximum probe interval exceeded, forcing probe");
            return ProbeDecision::probe(DecisionReason::MaxIntervalExceeded);
        }
        if !self.min_interval_met(last_probe, now) {
            return ProbeDecision::block(DecisionReason::MinIntervalNotMet);
        }
        if self.profile_config.quiet_hours_enabled && self.is_quiet_hours_at(now) {
            return ProbeDecision::block(DecisionReason::QuietHours);
        }
        if self.requires_absence() && !self.check_opportune_time().opportune {
            return ProbeDecision::block(DecisionReason::NotOpportune);
        }

        let gain = self.information_gain(model, self.outdoor_temperature());
        let threshold = self.profile_config.information_gain_threshold;
        if gain < threshold {
            debug!(gain, threshold, "information gain below threshold");
            return ProbeDecision::block(DecisionReason::LowInformationGain { gain, threshold });
        }
        ProbeDecision::probe(DecisionReason::Ready { gain })
    }

    /// Time since the last probe has reached the profile's maximum interval.
    ///
    /// No history, or a last probe in the future, never forces.
    pub fn max_interval_exceeded(&self, last_probe: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_probe {
            Some(last) if last <= now => now - last >= self.profile_config.max_interval(),
            _ => false,
        }
    }

    /// Enough time has passed since the last probe.
    ///
    /// A last probe in the future (clock moved back) counts as not met.
    pub fn min_interval_met(&self, last_probe: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_probe {
            None => true,
            Some(last) if last > now => {
                warn!(%last, %now, "last probe is in the future, refusing to probe");
                false
            }
            Some(last) => now - last >= self.profile_config.min_interval(),
        }
    }

    // --- Quiet hours ---

    pub fn is_quiet_hours_at(&self, now: DateTime<Utc>) -> bool {
        self.is_quiet_time(self.local_time(now))
    }

    /// Quiet-hours check on a wall-clock time.
    pub fn is_quiet_time(&self, time: NaiveTime) -> bool {
        self.quiet_hours().contains(time)
    }

    fn local_time(&self, now: DateTime<Utc>) -> NaiveTime {
        match self.config.utc_offset_minutes.and_then(|m| FixedOffset::east_opt(m * 60)) {
            Some(offset) => now.with_timezone(&offset).time(),
            None => now.with_timezone(&Local).time(),
        }
    }

    // --- Occupancy ---

    fn requires_absence(&self) -> bool {
        self.profile_config.presence_override_required && self.config.presence_detection_enabled
    }

    pub fn check_opportune_time(&self) -> OpportuneCheck {
        occupancy::check_opportune(
            self.provider.as_ref(),
            OccupancyEntities {
                presence: self.config.presence_entity_id.as_deref(),
                calendar: self.config.calendar_entity_id.as_deref(),
                manual_override: self.config.manual_override_entity_id.as_deref(),
            },
        )
    }

    // --- Information gain ---

    /// Outdoor temperature from the weather entity, if it can be read.
    pub fn outdoor_temperature(&self) -> Option<f64> {
        let id = self.config.weather_entity_id.as_deref()?;
        let state = self.provider.get_available_state(id)?;
        state.attribute_f64("temperature").or_else(|| state.numeric_state())
    }

    /// Bin boundaries in use: adaptive when enabled and history allows, else the profile's.
    pub fn active_bins(&self, model: &PassiveThermalModel) -> Vec<f64> {
        let static_bins = &self.profile_config.outdoor_temp_bins;
        if self.config.adaptive_bins_enabled {
            let num_bins = static_bins.len() + 1;
            if let Some(bins) = binning::adaptive_bins(&model.outdoor_temperatures(), num_bins) {
                return bins;
            }
        }
        static_bins.clone()
    }

    /// Gain for probing at `outdoor_temp`. Unknown temperature counts as maximum gain.
    pub fn information_gain(&self, model: &PassiveThermalModel, outdoor_temp: Option<f64>) -> f64 {
        match outdoor_temp.filter(|t| t.is_finite()) {
            Some(temp) => {
                let bins = self.active_bins(model);
                binning::information_gain(temp, &model.outdoor_temperatures(), &bins)
            }
            None => {
                debug!("outdoor temperature unknown, assuming high information gain");
                1.0
            }
        }
    }

    // --- Abort handling ---

    /// Conditions to watch for the probe starting at `now`.
    ///
    /// `outdoor_temp` falls back to the weather entity when not supplied.
    pub fn probe_start_context(
        &self,
        now: DateTime<Utc>,
        outdoor_temp: Option<f64>,
        target_temp: Option<f64>,
    ) -> ProbeWatch {
        ProbeWatch::new(now, outdoor_temp.or_else(|| self.outdoor_temperature()), target_temp)
            .with_occupied(self.presence_occupied())
    }

    /// Presence entity currently reports somebody home. Unknown counts as away.
    fn presence_occupied(&self) -> bool {
        self.config.presence_detection_enabled
            && self
                .config
                .presence_entity_id
                .as_deref()
                .and_then(|id| self.provider.get_available_state(id))
                .as_ref()
                .is_some_and(occupancy::is_present)
    }

    /// First matching abort condition for a running probe, if any.
    ///
    /// `current_outdoor` falls back to the weather entity when not supplied.
    pub fn check_abort_conditions(
        &self,
        watch: &ProbeWatch,
        current_outdoor: Option<f64>,
        current_target: Option<f64>,
    ) -> Option<AbortReason> {
        if !watch.start_occupied && self.presence_occupied() {
            return Some(AbortReason::UserReturned);
        }

        let outdoor_now = current_outdoor.or_else(|| self.outdoor_temperature());
        if let (Some(start), Some(now)) = (watch.start_outdoor_temp, outdoor_now) {
            let delta = (now - start).abs();
            if delta > self.config.outdoor_temp_change_threshold {
                return Some(AbortReason::OutdoorTempChanged { delta });
            }
        }

        if let (Some(start), Some(now)) = (watch.start_target_temp, current_target) {
            let delta = (now - start).abs();
            if delta > MANUAL_TARGET_CHANGE_THRESHOLD {
                return Some(AbortReason::TargetChanged { delta });
            }
        }

        if let Some(id) = self.config.hvac_entity_id.as_deref() {
            if let Some(state) = self.provider.get_state(id) {
                if !state.is_available() {
                    return Some(AbortReason::HvacFault { state: state.state });
                }
            }
        }

        None
    }

    /// Keep what an aborted probe measured, at reduced confidence.
    ///
    /// Probes shorter than the minimum duration, or with an unusable tau, are discarded.
    pub fn handle_partial_probe_data(
        &self,
        duration_minutes: f64,
        tau: f64,
        fit_quality: f64,
        reason: &str,
    ) -> Option<ProbeResult> {
        let min_minutes = f64::from(self.config.min_probe_duration_minutes);
        if !duration_minutes.is_finite() || duration_minutes < min_minutes {
            info!(duration_minutes, min_minutes, reason, "partial probe too short, discarded");
            return None;
        }
        if !tau.is_finite() || tau <= 0.0 {
            warn!(tau, reason, "partial probe has no usable tau, discarded");
            return None;
        }

        let fit_quality = fit_quality.clamp(0.0, 1.0);
        let confidence = fit_quality * PARTIAL_PROBE_CONFIDENCE_FACTOR;
        info!(duration_minutes, tau, confidence, reason, "salvaged partial probe");
        Some(ProbeResult::new(
            tau,
            confidence,
            (duration_minutes * 60.0).round() as i64,
            fit_quality,
            true,
        ))
    }

    // --- Reconfiguration ---

    /// Switch to another profile preset, replacing the whole profile config.
    pub fn update_profile(&mut self, profile: LearningProfile) {
        info!(from = %self.profile_config.profile, to = %profile, "learning profile switched");
        self.config.profile = profile;
        self.profile_config = ProfileConfig::for_profile(profile);
    }

    /// Validate and apply user overrides. Nothing changes unless every check passes.
    pub fn apply_advanced_settings(&mut self, settings: &AdvancedSettings) -> ThermalResult<()> {
        settings.validate()?;

        let profile_config = ProfileConfig {
            profile: LearningProfile::Custom,
            min_probe_interval_hours: settings.min_probe_interval_hours,
            max_probe_interval_days: settings.max_probe_interval_days,
            presence_override_required: self.profile_config.presence_override_required,
            information_gain_threshold: settings.information_gain_threshold,
            quiet_hours_enabled: settings.quiet_hours_enabled,
            outdoor_temp_bins: settings.temperature_bins.clone(),
        };
        let config = SchedulerConfig {
            profile: LearningProfile::Custom,
            quiet_hours_start: settings.quiet_hours_start,
            quiet_hours_end: settings.quiet_hours_end,
            outdoor_temp_change_threshold: settings.outdoor_temp_change_threshold,
            min_probe_duration_minutes: settings.min_probe_duration_minutes,
            presence_detection_enabled: settings.presence_detection_enabled,
            adaptive_bins_enabled: settings.adaptive_bins_enabled,
            ..self.config.clone()
        };

        self.profile_config = profile_config;
        self.config = config;
        info!("advanced settings applied");
        Ok(())
    }
}
