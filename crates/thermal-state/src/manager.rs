//! ThermalManager: the state machine, its tick loop, and persistence.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde_json::Value;
use thermal_core::config::{ManagerConfig, ThermalConfig};
use thermal_core::constants::{MAX_PLAUSIBLE_TAU, PERSISTED_PROBE_LIMIT, SCHEMA_VERSION, SNAPSHOT_VERSION};
use thermal_core::errors::ThermalResult;
use thermal_core::models::{HvacMode, PreferenceLevel, ProbeResult, ThermalConstants, ThermalState};
use thermal_core::traits::{NotificationSender, PersistCallback, StateProvider};
use thermal_core::tracing_setup::events;
use thermal_model::{fit_exponential, PassiveThermalModel, StabilityDetector};
use thermal_probe::{AbortReason, ProbeDecision, ProbeScheduler};
use tracing::{debug, info};

use crate::context::{OperatingWindow, ThermalContext};
use crate::handlers::handler_for;
use crate::phase::{PhaseData, RecoveryPlan};
use crate::snapshot::{self, ModelSnapshot, Snapshot, SnapshotMetadata, StateSnapshot};

/// Passive fits need at least this R² (priming accepts less).
const PASSIVE_MIN_FIT_QUALITY: f64 = 0.7;
const PASSIVE_MIN_FIT_QUALITY_AGGRESSIVE: f64 = 0.5;
/// Passive drift events are weaker evidence than a probe.
const PASSIVE_CONFIDENCE_FACTOR: f64 = 0.5;

/// Owns the thermal model and drives the six-state learning cycle.
///
/// Single-threaded: every entry point runs to completion within one tick.
pub struct ThermalManager {
    state: ThermalState,
    previous_state: Option<ThermalState>,
    last_transition: DateTime<Utc>,

    constants: ThermalConstants,
    config: ManagerConfig,

    model: PassiveThermalModel,
    phases: PhaseData,
    stability: StabilityDetector,

    scheduler: Option<ProbeScheduler>,
    notifier: Option<Arc<dyn NotificationSender>>,
    persist: Option<PersistCallback>,

    // Latest tick inputs.
    current_temp: Option<f64>,
    outdoor_temp: Option<f64>,
    hvac_mode: HvacMode,
    setpoint: Option<f64>,
    hvac_was_idle: bool,

    saves_count: u64,
    corruption_recoveries: u64,
    last_saved: Option<DateTime<Utc>>,
    restored: bool,
}

impl ThermalManager {
    pub fn new(constants: ThermalConstants) -> Self {
        Self {
            state: ThermalState::Priming,
            previous_state: None,
            last_transition: Utc::now(),
            model: PassiveThermalModel::from_constants(&constants),
            constants,
            config: ManagerConfig::default(),
            phases: PhaseData::default(),
            stability: StabilityDetector::new(),
            scheduler: None,
            notifier: None,
            persist: None,
            current_temp: None,
            outdoor_temp: None,
            hvac_mode: HvacMode::Off,
            setpoint: None,
            hvac_was_idle: false,
            saves_count: 0,
            corruption_recoveries: 0,
            last_saved: None,
            restored: false,
        }
    }

    /// Manager plus scheduler from a loaded configuration.
    pub fn from_config(config: &ThermalConfig, provider: Arc<dyn StateProvider>) -> Self {
        Self::new(config.constants.clone())
            .with_manager_config(config.manager.clone())
            .with_scheduler(ProbeScheduler::new(config.scheduler.clone(), provider))
    }

    pub fn with_manager_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scheduler(mut self, scheduler: ProbeScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_persist_callback(mut self, callback: PersistCallback) -> Self {
        self.persist = Some(callback);
        self
    }

    pub fn with_preference_level(mut self, level: PreferenceLevel) -> Self {
        self.config.preference_level = level;
        self
    }

    pub fn with_calibration_hour(mut self, hour: Option<u32>) -> Self {
        self.config.calibration_hour = hour;
        self
    }

    pub fn with_wrapped_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.config.wrapped_entity_id = Some(entity_id.into());
        self
    }

    // --- Accessors ---

    pub fn state(&self) -> ThermalState {
        self.state
    }

    pub fn previous_state(&self) -> Option<ThermalState> {
        self.previous_state
    }

    pub fn last_transition(&self) -> DateTime<Utc> {
        self.last_transition
    }

    pub fn model(&self) -> &PassiveThermalModel {
        &self.model
    }

    /// Mutable model access for collaborators feeding probes in directly.
    pub fn model_mut(&mut self) -> &mut PassiveThermalModel {
        &mut self.model
    }

    pub fn constants(&self) -> &ThermalConstants {
        &self.constants
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn scheduler(&self) -> Option<&ProbeScheduler> {
        self.scheduler.as_ref()
    }

    /// For `apply_advanced_settings` and profile switches.
    pub fn scheduler_mut(&mut self) -> Option<&mut ProbeScheduler> {
        self.scheduler.as_mut()
    }

    pub fn phases(&self) -> &PhaseData {
        &self.phases
    }

    pub fn setpoint(&self) -> Option<f64> {
        self.setpoint
    }

    pub fn set_setpoint(&mut self, setpoint: Option<f64>) {
        self.setpoint = setpoint.filter(|s| s.is_finite());
    }

    pub fn saves_count(&self) -> u64 {
        self.saves_count
    }

    // --- Diagnostics ---

    pub fn thermal_data_last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn thermal_state_restored(&self) -> bool {
        self.restored
    }

    pub fn corruption_recovery_count(&self) -> u64 {
        self.corruption_recoveries
    }

    /// Window for the active state around the setpoint (or the current temperature).
    pub fn operating_window(&self) -> Option<OperatingWindow> {
        let center = self.setpoint.or(self.current_temp)?;
        Some(handler_for(self.state).operating_window(center, self.config.preference_level))
    }

    /// Recovery ramp progress, 0.0 – 1.0, while recovering.
    pub fn recovery_progress(&self) -> Option<f64> {
        self.phases.recovery.as_ref().map(|r| r.progress)
    }

    /// Interpolated recovery target for the collaborator to apply.
    pub fn recovery_target(&self) -> Option<f64> {
        self.phases.recovery.as_ref().and_then(|r| r.current_target())
    }

    pub fn is_precise_measurement_mode(&self) -> bool {
        self.phases.precise_measurement
    }

    /// What the scheduler would decide right now.
    pub fn probe_decision(&self) -> Option<ProbeDecision> {
        self.scheduler.as_ref().map(|s| s.evaluate(&self.model))
    }

    /// Automatic probes are spaced at least `auto_probe_min_interval_hours` apart.
    pub fn can_auto_probe(&self) -> bool {
        self.can_auto_probe_at(Utc::now())
    }

    pub fn can_auto_probe_at(&self, now: DateTime<Utc>) -> bool {
        match self.phases.last_auto_probe {
            None => true,
            Some(last) if last > now => false,
            Some(last) => now - last >= Duration::hours(i64::from(self.config.auto_probe_min_interval_hours)),
        }
    }

    // --- Tick ---

    pub fn update_state(&mut self, current_temp: Option<f64>, outdoor_temp: Option<f64>, hvac_mode: HvacMode) {
        self.update_state_at(current_temp, outdoor_temp, hvac_mode, Utc::now());
    }

    /// One tick: passive learning, abort polling, handler, then the scheduler.
    ///
    /// A handler transition always wins. The scheduler is consulted only in
    /// DRIFTING and CORRECTING.
    pub fn update_state_at(
        &mut self,
        current_temp: Option<f64>,
        outdoor_temp: Option<f64>,
        hvac_mode: HvacMode,
        now: DateTime<Utc>,
    ) {
        self.current_temp = current_temp.filter(|t| t.is_finite());
        self.outdoor_temp = outdoor_temp.filter(|t| t.is_finite());
        self.hvac_mode = hvac_mode;

        self.passive_learning(now);

        let probe_abort = if self.state == ThermalState::Probing {
            self.poll_probe_abort()
        } else {
            None
        };

        let handler = handler_for(self.state);
        let window = self.operating_window();
        let current_temp = self.current_temp;
        let next = {
            let mut ctx = self.context(now, probe_abort);
            handler.execute(&mut ctx, current_temp, window)
        };

        if let Some(next) = next {
            if next != self.state {
                self.transition(next, now, "handler");
            }
            return;
        }

        if self.state.allows_opportunistic_probe() {
            let should_probe = self
                .scheduler
                .as_ref()
                .is_some_and(|s| s.should_probe_at(&self.model, now));
            if should_probe {
                self.transition(ThermalState::Probing, now, "scheduler");
            }
        }
    }

    // --- Transitions ---

    pub fn transition_to(&mut self, new_state: ThermalState) {
        self.transition(new_state, Utc::now(), "manual");
    }

    pub fn transition_to_at(&mut self, new_state: ThermalState, now: DateTime<Utc>) {
        self.transition(new_state, now, "manual");
    }

    /// Enter PROBING from any other state. No-op when already probing.
    pub fn force_probing(&mut self) {
        self.force_probing_at(Utc::now());
    }

    pub fn force_probing_at(&mut self, now: DateTime<Utc>) {
        if self.state == ThermalState::Probing {
            debug!("force_probing ignored, already probing");
            return;
        }
        self.transition(ThermalState::Probing, now, "forced");
    }

    /// Ramp from `initial_target` to `final_target`, then enter `target_state`.
    pub fn start_recovery(&mut self, initial_target: f64, final_target: f64, target_state: ThermalState) {
        self.start_recovery_at(initial_target, final_target, target_state, Utc::now());
    }

    pub fn start_recovery_at(
        &mut self,
        initial_target: f64,
        final_target: f64,
        target_state: ThermalState,
        now: DateTime<Utc>,
    ) {
        self.phases.pending_recovery = Some(RecoveryPlan {
            initial_target,
            final_target,
            target_state,
        });
        if self.state == ThermalState::Recovery {
            // Restart the ramp with the new plan.
            self.with_context(now, |ctx| {
                let handler = handler_for(ThermalState::Recovery);
                handler.on_exit(ctx);
                handler.on_enter(ctx);
            });
            return;
        }
        self.transition(ThermalState::Recovery, now, "recovery");
    }

    fn transition(&mut self, new_state: ThermalState, now: DateTime<Utc>, trigger: &str) {
        let old_state = self.state;
        if old_state == new_state {
            return;
        }

        self.with_context(now, |ctx| handler_for(old_state).on_exit(ctx));
        self.previous_state = Some(old_state);
        self.state = new_state;
        self.last_transition = now;
        self.with_context(now, |ctx| handler_for(new_state).on_enter(ctx));

        events::state_transition(old_state.as_str(), new_state.as_str(), trigger);
    }

    // --- Persistence ---

    /// Versioned snapshot of the manager. Every call counts as a save.
    pub fn serialize(&mut self) -> ThermalResult<Value> {
        let now = Utc::now();
        self.saves_count += 1;

        let history = self.model.probe_history();
        let skip = history.len().saturating_sub(PERSISTED_PROBE_LIMIT);
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION.to_string(),
            state: StateSnapshot {
                current_state: self.state,
                last_transition: self.last_transition,
                priming_start_time: match self.state {
                    ThermalState::Priming => self.phases.priming.started_at,
                    _ => None,
                },
            },
            model: ModelSnapshot {
                tau_cooling: self.model.tau_cooling(),
                tau_warming: self.model.tau_warming(),
                last_modified: self.model.last_modified(),
            },
            probe_history: history.iter().skip(skip).cloned().collect(),
            confidence: self.model.get_confidence(),
            metadata: SnapshotMetadata {
                saves_count: self.saves_count,
                corruption_recoveries: self.corruption_recoveries,
                schema_version: SCHEMA_VERSION.to_string(),
            },
        };

        let value = snapshot.to_value()?;
        self.last_saved = Some(now);
        debug!(saves = self.saves_count, probes = snapshot.probe_history.len(), "thermal snapshot written");
        Ok(value)
    }

    /// Load a snapshot. Never fails; corrupt fields fall back to defaults.
    ///
    /// Persisted probes are merged into the in-memory history.
    pub fn restore(&mut self, data: &Value) {
        self.restore_at(data, Utc::now());
    }

    pub fn restore_at(&mut self, data: &Value, now: DateTime<Utc>) {
        let restored = snapshot::read_snapshot(data, now);

        if restored.tau_cooling.is_some() || restored.tau_warming.is_some() {
            self.model.set_tau_values(
                restored.tau_cooling.unwrap_or(self.model.tau_cooling()),
                restored.tau_warming.unwrap_or(self.model.tau_warming()),
                restored.last_modified.unwrap_or(now),
            );
        }
        let added = self.model.extend_history(restored.probes);

        if let Some(saves) = restored.saves_count {
            self.saves_count = self.saves_count.max(saves);
        }
        self.corruption_recoveries = self
            .corruption_recoveries
            .max(restored.stored_recoveries.unwrap_or(0))
            + restored.recoveries;

        let old_state = self.state;
        self.with_context(now, |ctx| handler_for(old_state).on_exit(ctx));
        self.phases.clear_states();
        self.state = restored.state;
        self.previous_state = None;
        self.last_transition = restored.last_transition;
        self.phases.priming.started_at = restored.priming_start_time;
        let state = self.state;
        self.with_context(now, |ctx| handler_for(state).on_enter(ctx));

        self.restored = true;
        info!(
            state = %self.state,
            probes_added = added,
            history = self.model.probe_count(),
            recoveries = restored.recoveries,
            "thermal state restored"
        );
    }

    /// Back to PRIMING with hard-default taus. History and counters are kept.
    pub fn reset(&mut self) {
        let now = Utc::now();
        let old_state = self.state;
        self.with_context(now, |ctx| handler_for(old_state).on_exit(ctx));
        self.phases.clear_states();
        self.model.reset_tau();
        self.stability.clear();
        self.state = ThermalState::Priming;
        self.previous_state = Some(old_state);
        self.last_transition = now;
        self.with_context(now, |ctx| handler_for(ThermalState::Priming).on_enter(ctx));
        events::state_transition(old_state.as_str(), ThermalState::Priming.as_str(), "reset");
    }

    // --- Internals ---

    fn context(&mut self, now: DateTime<Utc>, probe_abort: Option<AbortReason>) -> ThermalContext<'_> {
        let auto_probe_allowed = self.can_auto_probe_at(now);
        let utc_offset = self.utc_offset();
        ThermalContext {
            now,
            current_temp: self.current_temp,
            outdoor_temp: self.outdoor_temp,
            hvac_mode: self.hvac_mode,
            setpoint: self.setpoint,
            previous_state: self.previous_state,
            constants: &self.constants,
            preference_level: self.config.preference_level,
            calibration_hour: self.config.calibration_hour,
            utc_offset,
            wrapped_entity_id: self.config.wrapped_entity_id.as_deref(),
            model: &mut self.model,
            phases: &mut self.phases,
            stability: &mut self.stability,
            scheduler: self.scheduler.as_ref(),
            notifier: self.notifier.as_deref(),
            persist: self.persist.as_ref(),
            probe_abort,
            auto_probe_allowed,
            auto_probe_confidence_threshold: self.config.auto_probe_confidence_threshold,
        }
    }

    fn with_context<F>(&mut self, now: DateTime<Utc>, f: F)
    where
        F: FnOnce(&mut ThermalContext<'_>),
    {
        let mut ctx = self.context(now, None);
        f(&mut ctx);
    }

    fn utc_offset(&self) -> Option<FixedOffset> {
        self.config
            .utc_offset_minutes
            .or_else(|| self.scheduler.as_ref().and_then(|s| s.config().utc_offset_minutes))
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
    }

    fn poll_probe_abort(&self) -> Option<AbortReason> {
        let scheduler = self.scheduler.as_ref()?;
        let watch = self.phases.probing.as_ref()?.watch;
        let reason = scheduler.check_abort_conditions(&watch, self.outdoor_temp, self.setpoint);
        if let Some(reason) = &reason {
            info!(%reason, "probe abort condition met");
        }
        reason
    }

    /// Feed the stability detector and learn from completed natural drift events.
    ///
    /// An idle run is examined when the HVAC comes back on, and only while
    /// PRIMING or DRIFTING. Priming accepts weaker fits.
    fn passive_learning(&mut self, now: DateTime<Utc>) {
        let Some(temp) = self.current_temp else {
            return;
        };
        let idle = !self.hvac_mode.is_active();
        let run_closed = self.hvac_was_idle && !idle;
        self.hvac_was_idle = idle;
        self.stability.add_reading(now, temp, idle);

        if !run_closed || !matches!(self.state, ThermalState::Priming | ThermalState::Drifting) {
            return;
        }
        let Some(event) = self.stability.find_drift_event() else {
            return;
        };
        let Some(fit) = fit_exponential(&event.samples) else {
            return;
        };

        let min_quality = if self.phases.aggressive_learning {
            PASSIVE_MIN_FIT_QUALITY_AGGRESSIVE
        } else {
            PASSIVE_MIN_FIT_QUALITY
        };
        if fit.fit_quality < min_quality || fit.tau_minutes >= MAX_PLAUSIBLE_TAU {
            debug!(fit = fit.fit_quality, tau = fit.tau_minutes, "drift event fit rejected");
            return;
        }

        // A falling room is a cooling drift.
        let is_cooling = match (event.samples.first(), event.samples.last()) {
            (Some((_, first)), Some((_, last))) => last < first,
            _ => return,
        };
        let confidence = fit.fit_quality * PASSIVE_CONFIDENCE_FACTOR;
        let probe = ProbeResult::new(
            fit.tau_minutes,
            confidence,
            event.duration().num_seconds(),
            fit.fit_quality,
            false,
        )
        .with_timestamp(event.end().unwrap_or(now))
        .with_outdoor_temp(self.outdoor_temp)
        .as_passive();

        self.model.update_tau_at(probe, is_cooling, now);
        events::probe_recorded(fit.tau_minutes, confidence, false, is_cooling);
        if let Some(callback) = &self.persist {
            callback();
        }
    }
}

impl std::fmt::Debug for ThermalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermalManager")
            .field("state", &self.state)
            .field("previous_state", &self.previous_state)
            .field("tau_cooling", &self.model.tau_cooling())
            .field("tau_warming", &self.model.tau_warming())
            .field("probes", &self.model.probe_count())
            .field("saves_count", &self.saves_count)
            .field("corruption_recoveries", &self.corruption_recoveries)
            .finish()
    }
}

impl Default for ThermalManager {
    fn default() -> Self {
        Self::new(ThermalConstants::default())
    }
}
