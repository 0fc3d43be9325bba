use chrono::Duration;
use thermal_core::constants::MAX_PLAUSIBLE_TAU;
use thermal_core::models::{PreferenceLevel, ProbeResult, ThermalState};
use thermal_core::tracing_setup::events;
use thermal_model::{fit_exponential, DecayFit};
use thermal_probe::{AbortReason, ProbeWatch};
use tracing::{debug, info};

use super::StateHandler;
use crate::context::{OperatingWindow, ThermalContext};
use crate::phase::ProbingPhase;

/// Fits below this R² keep the probe running.
const MIN_FIT_QUALITY: f64 = 0.6;

/// Active learning: the HVAC holds off and the room drifts while samples are collected.
pub struct ProbingHandler;

impl StateHandler for ProbingHandler {
    fn state(&self) -> ThermalState {
        ThermalState::Probing
    }

    fn execute(
        &self,
        ctx: &mut ThermalContext<'_>,
        current_temp: Option<f64>,
        _window: Option<OperatingWindow>,
    ) -> Option<ThermalState> {
        if ctx.phases.probing.is_none() {
            self.on_enter(ctx);
        }

        if let Some(reason) = ctx.probe_abort.take() {
            return Some(abort(ctx, &reason));
        }
        let Some(temp) = current_temp.filter(|t| t.is_finite()) else {
            return Some(abort(ctx, &AbortReason::internal("indoor temperature unavailable")));
        };

        let now = ctx.now;
        let (elapsed, fit) = {
            let phase = ctx.phases.probing.as_mut()?;
            phase.samples.push((now, temp));
            (now - phase.started_at, fit_exponential(&phase.samples))
        };
        if elapsed < Duration::zero() {
            return Some(abort(ctx, &AbortReason::internal("clock moved backwards")));
        }
        if elapsed < ctx.constants.probe_min() {
            return None;
        }

        match fit.filter(|f| is_usable(f, MIN_FIT_QUALITY)) {
            Some(fit) => Some(complete(ctx, fit, elapsed)),
            None if elapsed >= ctx.constants.probe_max() => {
                Some(abort(ctx, &AbortReason::internal("probe exceeded maximum duration")))
            }
            None => {
                debug!(elapsed_secs = elapsed.num_seconds(), fit = ?fit.map(|f| f.fit_quality), "fit not good enough yet, probing on");
                None
            }
        }
    }

    fn on_enter(&self, ctx: &mut ThermalContext<'_>) {
        let return_state = match ctx.previous_state {
            Some(state @ (ThermalState::Drifting | ThermalState::Correcting)) => state,
            _ => ThermalState::Drifting,
        };
        let watch = match ctx.scheduler {
            Some(scheduler) => scheduler.probe_start_context(ctx.now, ctx.outdoor_temp, ctx.setpoint),
            None => ProbeWatch::new(ctx.now, ctx.outdoor_temp, ctx.setpoint),
        };
        ctx.phases.probing = Some(ProbingPhase {
            started_at: ctx.now,
            start_temp: ctx.current_temp,
            samples: Vec::new(),
            watch,
            return_state,
        });
        info!(start_temp = ?ctx.current_temp, outdoor = ?ctx.outdoor_temp, "probe started");
        let message = format!(
            "Learning how {} drifts. The temperature may wander up to {:.1}°C from the setpoint.",
            ctx.entity_label(),
            ctx.preference_level.probe_drift()
        );
        ctx.notify("Thermal probe started", &message);
    }

    fn on_exit(&self, ctx: &mut ThermalContext<'_>) {
        ctx.phases.probing = None;
    }

    fn operating_window(&self, setpoint: f64, preference: PreferenceLevel) -> OperatingWindow {
        OperatingWindow::around(setpoint, preference.probe_drift())
    }
}

pub(crate) fn is_usable(fit: &DecayFit, min_quality: f64) -> bool {
    fit.fit_quality >= min_quality && fit.tau_minutes > 0.0 && fit.tau_minutes < MAX_PLAUSIBLE_TAU
}

/// Probe confidence: fit quality, scaled down for probes well short of the maximum length.
fn probe_confidence(fit_quality: f64, elapsed: Duration, max: Duration) -> f64 {
    let coverage = if max > Duration::zero() {
        elapsed.num_seconds() as f64 / max.num_seconds() as f64
    } else {
        1.0
    };
    (fit_quality * coverage.clamp(0.5, 1.0)).clamp(0.0, 1.0)
}

fn complete(ctx: &mut ThermalContext<'_>, fit: DecayFit, elapsed: Duration) -> ThermalState {
    let confidence = probe_confidence(fit.fit_quality, elapsed, ctx.constants.probe_max());
    let is_cooling = ctx.hvac_mode.is_cooling();
    let outdoor = ctx
        .outdoor_temp
        .or_else(|| ctx.phases.probing.as_ref().and_then(|p| p.watch.start_outdoor_temp));
    let probe = ProbeResult::new(fit.tau_minutes, confidence, elapsed.num_seconds(), fit.fit_quality, false)
        .with_timestamp(ctx.now)
        .with_outdoor_temp(outdoor);

    ctx.model.update_tau_at(probe, is_cooling, ctx.now);
    events::probe_recorded(fit.tau_minutes, confidence, false, is_cooling);
    ctx.persist();

    let message = format!(
        "Measured a time constant of {:.0} minutes for {} (fit {:.0}%).",
        fit.tau_minutes,
        ctx.entity_label(),
        fit.fit_quality * 100.0
    );
    ctx.notify("Thermal probe complete", &message);
    ThermalState::Calibrating
}

/// End the probe early, keeping whatever the scheduler agrees to salvage.
fn abort(ctx: &mut ThermalContext<'_>, reason: &AbortReason) -> ThermalState {
    let reason = reason.to_string();
    let Some(phase) = ctx.phases.probing.as_ref() else {
        return ThermalState::Drifting;
    };
    let return_state = phase.return_state;
    let elapsed = ctx.now - phase.started_at;
    let fit = fit_exponential(&phase.samples);

    let salvaged = match (ctx.scheduler, fit) {
        (Some(scheduler), Some(fit)) => scheduler.handle_partial_probe_data(
            elapsed.num_seconds() as f64 / 60.0,
            fit.tau_minutes,
            fit.fit_quality,
            &reason,
        ),
        _ => None,
    };

    let is_cooling = ctx.hvac_mode.is_cooling();
    let recorded = match salvaged {
        Some(probe) if probe.tau_value < MAX_PLAUSIBLE_TAU => {
            let probe = probe
                .with_timestamp(ctx.now)
                .with_outdoor_temp(ctx.outdoor_temp.or(phase.watch.start_outdoor_temp));
            events::probe_recorded(probe.tau_value, probe.confidence, true, is_cooling);
            ctx.model.update_tau_at(probe, is_cooling, ctx.now);
            ctx.persist();
            true
        }
        _ => false,
    };

    events::probe_aborted(&reason, recorded);
    ctx.notify("Thermal probe aborted", &format!("Probe on {} stopped: {reason}.", ctx.entity_label()));
    return_state
}
