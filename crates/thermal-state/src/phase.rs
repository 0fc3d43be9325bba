//! Per-state data arena.
//!
//! Handlers are stateless; anything they need to remember across ticks lives
//! here. `on_enter` initialises a state's slot and `on_exit` clears it.

use chrono::{DateTime, NaiveDate, Utc};
use thermal_core::models::ThermalState;
use thermal_model::Sample;
use thermal_probe::ProbeWatch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimingPhase {
    /// Elapsed-time anchor. Set lazily on the first tick, persisted in snapshots.
    pub started_at: Option<DateTime<Utc>>,
}

/// Requested ramp for the next recovery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryPlan {
    pub initial_target: f64,
    pub final_target: f64,
    pub target_state: ThermalState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryPhase {
    pub started_at: DateTime<Utc>,
    pub plan: Option<RecoveryPlan>,
    pub target_state: ThermalState,
    /// 0.0 – 1.0.
    pub progress: f64,
}

impl RecoveryPhase {
    /// Linearly interpolated target for the current progress.
    pub fn current_target(&self) -> Option<f64> {
        self.plan
            .map(|p| p.initial_target + (p.final_target - p.initial_target) * self.progress)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbingPhase {
    pub started_at: DateTime<Utc>,
    pub start_temp: Option<f64>,
    pub samples: Vec<Sample>,
    pub watch: ProbeWatch,
    /// Where an aborted or abandoned probe goes back to.
    pub return_state: ThermalState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibratingPhase {
    pub started_at: DateTime<Utc>,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseData {
    pub priming: PrimingPhase,
    pub recovery: Option<RecoveryPhase>,
    pub probing: Option<ProbingPhase>,
    pub calibrating: Option<CalibratingPhase>,

    /// Queued by `start_recovery`, consumed by the recovery handler's `on_enter`.
    pub pending_recovery: Option<RecoveryPlan>,
    pub precise_measurement: bool,
    /// Set while priming; loosens the passive-learning fit threshold.
    pub aggressive_learning: bool,
    pub last_auto_probe: Option<DateTime<Utc>>,
    pub last_calibration: Option<NaiveDate>,
}

impl PhaseData {
    /// Clear every per-state slot, keeping the cross-state bookkeeping.
    pub fn clear_states(&mut self) {
        self.priming = PrimingPhase::default();
        self.recovery = None;
        self.probing = None;
        self.calibrating = None;
        self.pending_recovery = None;
        self.precise_measurement = false;
        self.aggressive_learning = false;
    }
}
