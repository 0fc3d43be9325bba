//! Exponential decay fitting for probe and drift-event series.
//!
//! Model: `T(t) = A + B × e^(-t / tau)`. For a fixed tau the problem is linear
//! in A and B, so tau is found by a log-spaced grid search with a closed-form
//! least-squares fit at each grid point. Fit quality is the R² of the best fit.

use chrono::{DateTime, Utc};

/// One (timestamp, temperature) observation.
pub type Sample = (DateTime<Utc>, f64);

/// Smallest tau considered (minutes).
const TAU_GRID_MIN: f64 = 5.0;
/// Largest tau considered (minutes).
const TAU_GRID_MAX: f64 = 2000.0;
const TAU_GRID_STEPS: usize = 240;
/// Series spanning less than this (°C) carry no usable signal.
pub const MIN_TEMPERATURE_SPAN: f64 = 0.3;
const MIN_SAMPLES: usize = 3;

/// Result of fitting an exponential to a temperature series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayFit {
    /// Time constant in minutes.
    pub tau_minutes: f64,
    /// R², clamped to 0.0 – 1.0.
    pub fit_quality: f64,
    /// Temperature the series is heading toward.
    pub asymptote: f64,
    /// Span of the series in minutes.
    pub duration_minutes: f64,
}

/// Fit `A + B·e^(-t/tau)` to the samples.
///
/// Returns `None` for fewer than 3 samples, non-finite values, no elapsed time,
/// or a temperature span below [`MIN_TEMPERATURE_SPAN`].
pub fn fit_exponential(samples: &[Sample]) -> Option<DecayFit> {
    if samples.len() < MIN_SAMPLES {
        return None;
    }
    let t0 = samples.iter().map(|(ts, _)| *ts).min()?;
    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|(ts, temp)| ((*ts - t0).num_milliseconds() as f64 / 60_000.0, *temp))
        .collect();

    if points.iter().any(|(t, y)| !t.is_finite() || !y.is_finite()) {
        return None;
    }
    let duration_minutes = points.iter().map(|(t, _)| *t).fold(0.0, f64::max);
    if duration_minutes <= 0.0 {
        return None;
    }
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
    if hi - lo < MIN_TEMPERATURE_SPAN {
        return None;
    }

    let n = points.len() as f64;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sst: f64 = points.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
    if sst <= f64::EPSILON {
        return None;
    }

    let ratio = (TAU_GRID_MAX / TAU_GRID_MIN).ln() / (TAU_GRID_STEPS - 1) as f64;
    let mut best: Option<(f64, f64, f64)> = None; // (sse, tau, asymptote)
    for step in 0..TAU_GRID_STEPS {
        let tau = TAU_GRID_MIN * (ratio * step as f64).exp();
        if let Some((sse, a)) = least_squares_at(&points, tau) {
            if best.map_or(true, |(best_sse, _, _)| sse < best_sse) {
                best = Some((sse, tau, a));
            }
        }
    }

    let (sse, tau, asymptote) = best?;
    Some(DecayFit {
        tau_minutes: tau,
        fit_quality: (1.0 - sse / sst).clamp(0.0, 1.0),
        asymptote,
        duration_minutes,
    })
}

/// Closed-form fit of `y = A + B·x` with `x = e^(-t/tau)`. Returns (SSE, A).
fn least_squares_at(points: &[(f64, f64)], tau: f64) -> Option<(f64, f64)> {
    let n = points.len() as f64;
    let xs: Vec<f64> = points.iter().map(|(t, _)| (-t / tau).exp()).collect();
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy) = xs
        .iter()
        .zip(points)
        .fold((0.0, 0.0), |(sxx, sxy), (x, (_, y))| {
            let dx = x - x_mean;
            (sxx + dx * dx, sxy + dx * (y - y_mean))
        });
    if sxx <= 1e-12 {
        return None;
    }
    let b = sxy / sxx;
    let a = y_mean - b * x_mean;
    let sse = xs
        .iter()
        .zip(points)
        .map(|(x, (_, y))| (y - (a + b * x)).powi(2))
        .sum();
    Some((sse, a))
}
