use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use thermal_core::config::defaults::{DEFAULT_TAU_COOLING, DEFAULT_TAU_WARMING};
use thermal_core::constants::{CONFIDENCE_SAMPLE_TARGET, DECAY_RATE_PER_DAY, MAX_PROBE_HISTORY};
use thermal_core::models::{ProbeResult, ThermalConstants};
use tracing::debug;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Passive thermal model: probe history plus the taus derived from it.
///
/// Weighted tau:
///
/// ```text
/// tau = Σ(w_i × tau_i) / Σ(w_i)
/// w_i = decay_rate ^ age_days_i × confidence_i
/// ```
///
/// With the default decay rate of 0.98 a probe loses half its weight in ~34.3 days.
#[derive(Debug, Clone)]
pub struct PassiveThermalModel {
    tau_cooling: f64,
    tau_warming: f64,
    decay_rate: f64,
    probe_history: VecDeque<ProbeResult>,
    last_modified: DateTime<Utc>,
}

impl PassiveThermalModel {
    pub fn new(tau_cooling: f64, tau_warming: f64) -> Self {
        Self {
            tau_cooling,
            tau_warming,
            decay_rate: DECAY_RATE_PER_DAY,
            probe_history: VecDeque::with_capacity(MAX_PROBE_HISTORY),
            last_modified: Utc::now(),
        }
    }

    pub fn from_constants(constants: &ThermalConstants) -> Self {
        Self::new(constants.tau_cooling, constants.tau_warming)
    }

    /// Override the per-day decay rate (must be in (0, 1]).
    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        if decay_rate > 0.0 && decay_rate <= 1.0 {
            self.decay_rate = decay_rate;
        }
        self
    }

    pub fn tau_cooling(&self) -> f64 {
        self.tau_cooling
    }

    pub fn tau_warming(&self) -> f64 {
        self.tau_warming
    }

    pub fn tau_for(&self, is_cooling: bool) -> f64 {
        if is_cooling {
            self.tau_cooling
        } else {
            self.tau_warming
        }
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Probe history, oldest first.
    pub fn probe_history(&self) -> &VecDeque<ProbeResult> {
        &self.probe_history
    }

    pub fn probe_count(&self) -> usize {
        self.probe_history.len()
    }

    pub fn last_probe_time(&self) -> Option<DateTime<Utc>> {
        self.probe_history.back().map(|p| p.timestamp)
    }

    /// Finish time of the newest deliberate probe, ignoring passive results.
    pub fn last_active_probe_time(&self) -> Option<DateTime<Utc>> {
        self.probe_history.iter().rev().find(|p| !p.passive).map(|p| p.timestamp)
    }

    /// Outdoor temperatures recorded with historical probes.
    pub fn outdoor_temperatures(&self) -> Vec<f64> {
        self.probe_history.iter().filter_map(|p| p.outdoor_temp).collect()
    }

    /// Record a probe and recompute the tau for its direction.
    pub fn update_tau(&mut self, probe: ProbeResult, is_cooling: bool) {
        self.update_tau_at(probe, is_cooling, Utc::now());
    }

    /// [`update_tau`](Self::update_tau) with an explicit clock.
    pub fn update_tau_at(&mut self, probe: ProbeResult, is_cooling: bool, now: DateTime<Utc>) {
        self.push_probe(probe.with_direction(is_cooling));

        if let Some(tau) = self.calculate_weighted_tau_at(is_cooling, now) {
            if is_cooling {
                self.tau_cooling = tau;
            } else {
                self.tau_warming = tau;
            }
            debug!(tau, is_cooling, probes = self.probe_history.len(), "weighted tau updated");
        }
        self.last_modified = now;
    }

    /// Age-decayed, confidence-weighted tau for one direction.
    ///
    /// `None` when no probe applies to the direction or all weights are zero.
    pub fn calculate_weighted_tau(&self, is_cooling: bool) -> Option<f64> {
        self.calculate_weighted_tau_at(is_cooling, Utc::now())
    }

    pub fn calculate_weighted_tau_at(&self, is_cooling: bool, now: DateTime<Utc>) -> Option<f64> {
        let (weighted_sum, weight_total) = self
            .probe_history
            .iter()
            .filter(|p| p.applies_to(is_cooling))
            .fold((0.0, 0.0), |(sum, total), p| {
                let w = self.decay_weight(p, now);
                (sum + w * p.tau_value, total + w)
            });

        if weight_total > f64::EPSILON {
            Some(weighted_sum / weight_total)
        } else {
            None
        }
    }

    /// Weight of one probe: `decay_rate ^ age_days × confidence`.
    ///
    /// Probes from the future count as age zero.
    pub fn decay_weight(&self, probe: &ProbeResult, now: DateTime<Utc>) -> f64 {
        let age_days = (now - probe.timestamp).num_milliseconds().max(0) as f64 / MILLIS_PER_DAY;
        self.decay_rate.powf(age_days) * probe.confidence
    }

    /// Overall model confidence from the number of collected probes.
    ///
    /// Logarithmic in the sample count, reaching 1.0 at 30 probes.
    /// Adding a probe never lowers it.
    pub fn get_confidence(&self) -> f64 {
        let n = self.probe_history.len();
        if n == 0 {
            return 0.0;
        }
        let target = CONFIDENCE_SAMPLE_TARGET as f64;
        ((1.0 + n as f64).ln() / (1.0 + target).ln()).min(1.0)
    }

    /// Project the indoor temperature `minutes` ahead with the HVAC idle.
    ///
    /// `outdoor + (current - outdoor) × e^(-minutes / tau)`
    pub fn predict_drift(&self, current: f64, outdoor: f64, minutes: f64, is_cooling: bool) -> f64 {
        let tau = self.tau_for(is_cooling);
        if tau <= 0.0 || minutes <= 0.0 {
            return current;
        }
        outdoor + (current - outdoor) * (-minutes / tau).exp()
    }

    /// Merge probes (e.g. restored from disk) into the history.
    ///
    /// Existing probes are kept. Identical records are stored once, order is by
    /// timestamp, and only the newest entries up to capacity survive.
    pub fn extend_history<I>(&mut self, probes: I) -> usize
    where
        I: IntoIterator<Item = ProbeResult>,
    {
        let before = self.probe_history.len();
        let mut merged: Vec<ProbeResult> = self.probe_history.drain(..).collect();
        for probe in probes {
            if !merged.contains(&probe) {
                merged.push(probe);
            }
        }
        merged.sort_by_key(|p| p.timestamp);
        let skip = merged.len().saturating_sub(MAX_PROBE_HISTORY);
        self.probe_history.extend(merged.into_iter().skip(skip));
        self.probe_history.len().saturating_sub(before)
    }

    /// Replace both taus (restore path; history is left untouched).
    pub fn set_tau_values(&mut self, tau_cooling: f64, tau_warming: f64, last_modified: DateTime<Utc>) {
        self.tau_cooling = tau_cooling;
        self.tau_warming = tau_warming;
        self.last_modified = last_modified;
    }

    /// Back to the hard-coded default taus. Probe history is kept.
    pub fn reset_tau(&mut self) {
        self.tau_cooling = DEFAULT_TAU_COOLING;
        self.tau_warming = DEFAULT_TAU_WARMING;
        self.last_modified = Utc::now();
    }

    /// Insert keeping timestamps non-decreasing, evicting the oldest at capacity.
    fn push_probe(&mut self, probe: ProbeResult) {
        match self.probe_history.back() {
            Some(last) if probe.timestamp < last.timestamp => {
                let idx = self
                    .probe_history
                    .partition_point(|p| p.timestamp <= probe.timestamp);
                self.probe_history.insert(idx, probe);
            }
            _ => self.probe_history.push_back(probe),
        }
        while self.probe_history.len() > MAX_PROBE_HISTORY {
            self.probe_history.pop_front();
        }
    }
}

impl Default for PassiveThermalModel {
    fn default() -> Self {
        Self::new(DEFAULT_TAU_COOLING, DEFAULT_TAU_WARMING)
    }
}
