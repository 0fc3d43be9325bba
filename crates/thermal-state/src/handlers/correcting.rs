use thermal_core::models::ThermalState;
use tracing::debug;

use super::{try_auto_probe, StateHandler};
use crate::context::{OperatingWindow, ThermalContext};

/// Back within this distance of the window centre ends the correction (°C).
const SETTLED_TOLERANCE: f64 = 0.2;

/// Active HVAC correction toward the setpoint.
pub struct CorrectingHandler;

impl StateHandler for CorrectingHandler {
    fn state(&self) -> ThermalState {
        ThermalState::Correcting
    }

    fn execute(
        &self,
        ctx: &mut ThermalContext<'_>,
        current_temp: Option<f64>,
        window: Option<OperatingWindow>,
    ) -> Option<ThermalState> {
        if let (Some(temp), Some(window)) = (current_temp, window) {
            if (temp - window.center()).abs() <= SETTLED_TOLERANCE {
                debug!(temp, center = window.center(), "correction settled");
                return Some(ThermalState::Drifting);
            }
        }
        try_auto_probe(ctx)
    }
}
