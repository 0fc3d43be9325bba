//! Detects stable periods and natural drift events from the reading stream.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

use crate::analysis::Sample;

const MAX_READINGS: usize = 720;
const STABLE_WINDOW_MINUTES: i64 = 10;
const STABLE_SPAN_THRESHOLD: f64 = 0.1;
const MIN_DRIFT_MINUTES: i64 = 60;
const MIN_DRIFT_CHANGE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Reading {
    timestamp: DateTime<Utc>,
    temperature: f64,
    hvac_idle: bool,
}

/// A completed HVAC-idle period long enough to fit a tau from.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftEvent {
    pub samples: Vec<Sample>,
}

impl DriftEvent {
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|(ts, _)| *ts)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|(ts, _)| *ts)
    }

    pub fn duration(&self) -> Duration {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => end - start,
            _ => Duration::zero(),
        }
    }
}

/// Rolling buffer of indoor readings tagged with whether the HVAC was idle.
#[derive(Debug, Clone, Default)]
pub struct StabilityDetector {
    readings: VecDeque<Reading>,
}

impl StabilityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    /// Record a reading. Non-finite temperatures and out-of-order timestamps are dropped.
    pub fn add_reading(&mut self, timestamp: DateTime<Utc>, temperature: f64, hvac_idle: bool) {
        if !temperature.is_finite() {
            return;
        }
        if let Some(last) = self.readings.back() {
            if timestamp < last.timestamp {
                // Clock went backwards; history before the jump is no longer comparable.
                self.readings.clear();
            }
        }
        self.readings.push_back(Reading {
            timestamp,
            temperature,
            hvac_idle,
        });
        while self.readings.len() > MAX_READINGS {
            self.readings.pop_front();
        }
    }

    /// True when the last 10 minutes hold at least three readings within 0.1 °C.
    pub fn is_stable(&self, now: DateTime<Utc>) -> bool {
        let cutoff = now - Duration::minutes(STABLE_WINDOW_MINUTES);
        let recent: Vec<f64> = self
            .readings
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .map(|r| r.temperature)
            .collect();
        if recent.len() < 3 {
            return false;
        }
        let (lo, hi) = recent
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(*t), hi.max(*t)));
        hi - lo <= STABLE_SPAN_THRESHOLD
    }

    /// Take the most recent closed idle run, if it qualifies as a drift event.
    ///
    /// A run is closed once a non-idle reading follows it. Readings up to the
    /// closing one are consumed whether or not the run qualified.
    pub fn find_drift_event(&mut self) -> Option<DriftEvent> {
        let close_idx = self.readings.iter().rposition(|r| !r.hvac_idle)?;
        let run_start = self
            .readings
            .range(..close_idx)
            .rposition(|r| !r.hvac_idle)
            .map_or(0, |i| i + 1);

        let samples: Vec<Sample> = self
            .readings
            .range(run_start..close_idx)
            .map(|r| (r.timestamp, r.temperature))
            .collect();
        self.readings.drain(..close_idx);

        let event = DriftEvent { samples };
        let change = match (event.samples.first(), event.samples.last()) {
            (Some((_, first)), Some((_, last))) => (last - first).abs(),
            _ => return None,
        };
        if event.duration() >= Duration::minutes(MIN_DRIFT_MINUTES) && change >= MIN_DRIFT_CHANGE {
            Some(event)
        } else {
            None
        }
    }
}
