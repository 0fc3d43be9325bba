use thermal_core::models::ThermalState;
use tracing::{debug, warn};

use super::StateHandler;
use crate::context::{OperatingWindow, ThermalContext};

/// Initial learning period. Learns passively until `priming_duration` elapses.
pub struct PrimingHandler;

impl StateHandler for PrimingHandler {
    fn state(&self) -> ThermalState {
        ThermalState::Priming
    }

    fn execute(
        &self,
        ctx: &mut ThermalContext<'_>,
        _current_temp: Option<f64>,
        _window: Option<OperatingWindow>,
    ) -> Option<ThermalState> {
        ctx.phases.aggressive_learning = true;

        let now = ctx.now;
        let anchor = *ctx.phases.priming.started_at.get_or_insert(now);
        if now < anchor {
            warn!(%anchor, %now, "clock moved backwards during priming, resetting anchor");
            ctx.phases.priming.started_at = Some(now);
            return None;
        }

        let elapsed = now - anchor;
        if elapsed >= ctx.constants.priming() {
            debug!(elapsed_secs = elapsed.num_seconds(), "priming complete");
            return Some(ThermalState::Drifting);
        }
        None
    }

    fn on_enter(&self, ctx: &mut ThermalContext<'_>) {
        ctx.phases.priming.started_at.get_or_insert(ctx.now);
        ctx.phases.aggressive_learning = true;
    }

    fn on_exit(&self, ctx: &mut ThermalContext<'_>) {
        ctx.phases.priming.started_at = None;
        ctx.phases.aggressive_learning = false;
    }
}
