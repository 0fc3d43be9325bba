use thermal_core::models::ThermalState;
use tracing::{debug, info};

use super::{try_auto_probe, StateHandler};
use crate::context::{OperatingWindow, ThermalContext};

/// Idle, energy-saving phase. The room drifts freely inside the window.
pub struct DriftingHandler;

impl StateHandler for DriftingHandler {
    fn state(&self) -> ThermalState {
        ThermalState::Drifting
    }

    fn execute(
        &self,
        ctx: &mut ThermalContext<'_>,
        current_temp: Option<f64>,
        window: Option<OperatingWindow>,
    ) -> Option<ThermalState> {
        if let (Some(temp), Some(window)) = (current_temp, window) {
            if !window.contains(temp) {
                debug!(temp, lower = window.lower, upper = window.upper, "left operating window");
                return Some(ThermalState::Correcting);
            }
        }

        if let Some(next) = try_auto_probe(ctx) {
            return Some(next);
        }

        if calibration_due(ctx) {
            info!("daily calibration slot reached with a stable room");
            return Some(ThermalState::Calibrating);
        }
        None
    }

    fn on_enter(&self, ctx: &mut ThermalContext<'_>) {
        ctx.phases.aggressive_learning = false;
    }
}

/// Configured hour, room stable, and not yet calibrated today.
fn calibration_due(ctx: &ThermalContext<'_>) -> bool {
    let Some(hour) = ctx.calibration_hour else {
        return false;
    };
    let (today, current_hour) = ctx.local_date_hour();
    current_hour == hour && ctx.phases.last_calibration != Some(today) && ctx.stability.is_stable(ctx.now)
}
