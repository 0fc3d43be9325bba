//! State handlers: one stateless unit struct per [`ThermalState`].
//!
//! Handlers never reference each other. They read and write only through
//! the [`ThermalContext`] and report a transition by returning the next state.

mod calibrating;
mod correcting;
mod drifting;
mod priming;
mod probing;
mod recovery;

pub use calibrating::CalibratingHandler;
pub use correcting::CorrectingHandler;
pub use drifting::DriftingHandler;
pub use priming::PrimingHandler;
pub use probing::ProbingHandler;
pub use recovery::RecoveryHandler;

use thermal_core::models::{PreferenceLevel, ThermalState};
use tracing::info;

use crate::context::{OperatingWindow, ThermalContext};

/// Behaviour of one state.
pub trait StateHandler: Send + Sync {
    fn state(&self) -> ThermalState;

    /// Run one tick. `Some(next)` requests a transition; `None` stays put.
    fn execute(
        &self,
        ctx: &mut ThermalContext<'_>,
        current_temp: Option<f64>,
        window: Option<OperatingWindow>,
    ) -> Option<ThermalState>;

    fn on_enter(&self, _ctx: &mut ThermalContext<'_>) {}

    fn on_exit(&self, _ctx: &mut ThermalContext<'_>) {}

    /// Acceptable band around `setpoint` while in this state.
    fn operating_window(&self, setpoint: f64, preference: PreferenceLevel) -> OperatingWindow {
        OperatingWindow::around(setpoint, preference.comfort_band())
    }
}

/// The handler responsible for `state`.
pub fn handler_for(state: ThermalState) -> &'static dyn StateHandler {
    match state {
        ThermalState::Priming => &PrimingHandler,
        ThermalState::Drifting => &DriftingHandler,
        ThermalState::Correcting => &CorrectingHandler,
        ThermalState::Recovery => &RecoveryHandler,
        ThermalState::Probing => &ProbingHandler,
        ThermalState::Calibrating => &CalibratingHandler,
    }
}

/// Automatic probe when the model is still unsure and the 24 h gate is open.
///
/// Independent of the scheduler's opportunistic path.
pub(crate) fn try_auto_probe(ctx: &mut ThermalContext<'_>) -> Option<ThermalState> {
    let confidence = ctx.model.get_confidence();
    if confidence >= ctx.auto_probe_confidence_threshold || !ctx.auto_probe_allowed {
        return None;
    }

    ctx.phases.last_auto_probe = Some(ctx.now);
    info!(confidence, threshold = ctx.auto_probe_confidence_threshold, "starting automatic probe");
    let message = format!(
        "Model confidence for {} is {:.0}%. Starting an automatic probe to learn how the room drifts.",
        ctx.entity_label(),
        confidence * 100.0
    );
    ctx.notify("Automatic thermal probe", &message);
    Some(ThermalState::Probing)
}
