use chrono::Duration;
use thermal_core::models::{PreferenceLevel, ProbeResult, ThermalState};
use thermal_core::tracing_setup::events;
use thermal_model::fit_exponential;
use tracing::{debug, info};

use super::probing::is_usable;
use super::StateHandler;
use crate::context::{OperatingWindow, ThermalContext};
use crate::phase::CalibratingPhase;

/// Half-width of the calibration band (°C).
const CALIBRATION_BAND: f64 = 0.1;
/// Lower bar than a probe: calibration series are short.
const MIN_FIT_QUALITY: f64 = 0.4;
/// Calibration refinements count for less than a full probe.
const CONFIDENCE_FACTOR: f64 = 0.5;

/// Tight-band hold for clean offset readings, with an optional tau refinement.
pub struct CalibratingHandler;

impl StateHandler for CalibratingHandler {
    fn state(&self) -> ThermalState {
        ThermalState::Calibrating
    }

    fn execute(
        &self,
        ctx: &mut ThermalContext<'_>,
        current_temp: Option<f64>,
        _window: Option<OperatingWindow>,
    ) -> Option<ThermalState> {
        let duration = ctx.constants.calibrating();
        if duration <= Duration::zero() {
            return Some(ThermalState::Drifting);
        }

        let now = ctx.now;
        let phase = ctx.phases.calibrating.get_or_insert_with(|| CalibratingPhase {
            started_at: now,
            samples: Vec::new(),
        });
        if let Some(temp) = current_temp.filter(|t| t.is_finite()) {
            phase.samples.push((now, temp));
        }

        let elapsed = now - phase.started_at;
        if elapsed >= Duration::zero() && elapsed < duration {
            return None;
        }

        let fit = fit_exponential(&phase.samples);
        if let Some(fit) = fit.filter(|f| is_usable(f, MIN_FIT_QUALITY)) {
            let confidence = fit.fit_quality * CONFIDENCE_FACTOR;
            let is_cooling = ctx.hvac_mode.is_cooling();
            let probe = ProbeResult::new(
                fit.tau_minutes,
                confidence,
                elapsed.num_seconds().max(1),
                fit.fit_quality,
                false,
            )
            .with_timestamp(now)
            .with_outdoor_temp(ctx.outdoor_temp);
            ctx.model.update_tau_at(probe, is_cooling, now);
            events::probe_recorded(fit.tau_minutes, confidence, false, is_cooling);
            ctx.persist();
        } else {
            debug!(fit = ?fit.map(|f| f.fit_quality), "calibration series not usable for tau refinement");
        }
        Some(ThermalState::Drifting)
    }

    fn on_enter(&self, ctx: &mut ThermalContext<'_>) {
        ctx.phases.precise_measurement = true;
        ctx.phases.calibrating = Some(CalibratingPhase {
            started_at: ctx.now,
            samples: Vec::new(),
        });
        ctx.phases.last_calibration = Some(ctx.local_date_hour().0);
        info!("calibration started, precise measurement mode on");
    }

    fn on_exit(&self, ctx: &mut ThermalContext<'_>) {
        ctx.phases.precise_measurement = false;
        ctx.phases.calibrating = None;
    }

    fn operating_window(&self, setpoint: f64, _preference: PreferenceLevel) -> OperatingWindow {
        OperatingWindow::around(setpoint, CALIBRATION_BAND)
    }
}
