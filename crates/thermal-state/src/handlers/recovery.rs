use chrono::Duration;
use thermal_core::models::ThermalState;
use tracing::{debug, warn};

use super::StateHandler;
use crate::context::{OperatingWindow, ThermalContext};
use crate::phase::{RecoveryPhase, RecoveryPlan};

/// Gradual ramp from an initial to a final target over `recovery_duration`.
pub struct RecoveryHandler;

impl StateHandler for RecoveryHandler {
    fn state(&self) -> ThermalState {
        ThermalState::Recovery
    }

    fn execute(
        &self,
        ctx: &mut ThermalContext<'_>,
        _current_temp: Option<f64>,
        _window: Option<OperatingWindow>,
    ) -> Option<ThermalState> {
        let now = ctx.now;
        let duration = ctx.constants.recovery();
        let phase = ctx.phases.recovery.get_or_insert_with(|| RecoveryPhase {
            started_at: now,
            plan: None,
            target_state: ThermalState::Drifting,
            progress: 0.0,
        });

        let elapsed = now - phase.started_at;
        if duration <= Duration::zero() || elapsed < Duration::zero() {
            if elapsed < Duration::zero() {
                warn!(started = %phase.started_at, %now, "clock moved backwards during recovery");
            }
            phase.progress = 1.0;
            return Some(phase.target_state);
        }

        phase.progress =
            (elapsed.num_milliseconds() as f64 / duration.num_milliseconds() as f64).min(1.0);
        debug!(progress = phase.progress, target = ?phase.current_target(), "recovery tick");
        if phase.progress >= 1.0 {
            return Some(phase.target_state);
        }
        None
    }

    fn on_enter(&self, ctx: &mut ThermalContext<'_>) {
        let plan = ctx.phases.pending_recovery.take().or_else(|| {
            ctx.setpoint.or(ctx.current_temp).map(|target| RecoveryPlan {
                initial_target: ctx.current_temp.unwrap_or(target),
                final_target: target,
                target_state: ThermalState::Drifting,
            })
        });
        let target_state = match plan.map(|p| p.target_state) {
            Some(ThermalState::Recovery) | None => ThermalState::Drifting,
            Some(state) => state,
        };
        ctx.phases.recovery = Some(RecoveryPhase {
            started_at: ctx.now,
            plan,
            target_state,
            progress: 0.0,
        });
    }

    fn on_exit(&self, ctx: &mut ThermalContext<'_>) {
        ctx.phases.recovery = None;
    }
}
