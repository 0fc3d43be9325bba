//! Outdoor-temperature binning and information gain.
//!
//! Bins are delimited by ascending boundaries; a temperature's bin index is
//! the number of boundaries at or below it. With boundaries
//! `[-10, 0, 10, 20, 30]` there are six bins and 30.0 falls in bin 5.

use thermal_core::constants::{ADAPTIVE_BINS_MIN_SAMPLES, ADAPTIVE_BINS_MIN_SPREAD};

/// Index of the bin `temperature` falls into.
pub fn assign_bin(temperature: f64, boundaries: &[f64]) -> usize {
    boundaries.iter().take_while(|b| temperature >= **b).count()
}

/// Percentile-derived boundaries for `num_bins` bins.
///
/// Needs at least 50 finite samples, otherwise `None`. Consecutive
/// boundaries are pushed apart to keep a 5 °C minimum spread.
pub fn adaptive_bins(temperatures: &[f64], num_bins: usize) -> Option<Vec<f64>> {
    let mut sorted: Vec<f64> = temperatures.iter().copied().filter(|t| t.is_finite()).collect();
    if sorted.len() < ADAPTIVE_BINS_MIN_SAMPLES || num_bins < 2 {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mut boundaries: Vec<f64> = (1..num_bins)
        .map(|i| percentile(&sorted, i as f64 / num_bins as f64))
        .collect();
    for i in 1..boundaries.len() {
        let floor = boundaries[i - 1] + ADAPTIVE_BINS_MIN_SPREAD;
        if boundaries[i] < floor {
            boundaries[i] = floor;
        }
    }
    Some(boundaries)
}

/// Linear-interpolated percentile of sorted data, `fraction` in 0.0 – 1.0.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let rank = fraction * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Information gain of probing at `temperature` given historical probe temperatures.
///
/// ```text
/// coverage   = bins with at least one probe / total bins
/// saturation = 1 / (probes in this temperature's bin + 1)
/// gain       = min((1 - coverage) + saturation, 1.0)
/// ```
pub fn information_gain(temperature: f64, history: &[f64], boundaries: &[f64]) -> f64 {
    let num_bins = boundaries.len() + 1;
    let mut counts = vec![0usize; num_bins];
    for t in history.iter().filter(|t| t.is_finite()) {
        counts[assign_bin(*t, boundaries)] += 1;
    }

    let covered = counts.iter().filter(|c| **c > 0).count();
    let coverage = covered as f64 / num_bins as f64;
    let saturation = 1.0 / (counts[assign_bin(temperature, boundaries)] as f64 + 1.0);

    ((1.0 - coverage) + saturation).min(1.0)
}
