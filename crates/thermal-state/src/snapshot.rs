//! Versioned persistence snapshot.
//!
//! Writing goes through typed structs. Reading walks a `serde_json::Value`
//! field by field so one corrupt field never costs the rest of the snapshot.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thermal_core::constants::{MAX_PLAUSIBLE_TAU, SNAPSHOT_VERSION};
use thermal_core::errors::{SnapshotError, ThermalResult};
use thermal_core::models::{ProbeResult, ThermalState};
use thermal_core::tracing_setup::events;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub state: StateSnapshot,
    pub model: ModelSnapshot,
    /// Most recent probes only, oldest first.
    pub probe_history: Vec<ProbeResult>,
    pub confidence: f64,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub current_state: ThermalState,
    pub last_transition: DateTime<Utc>,
    /// Priming anchor; `null` outside priming.
    pub priming_start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub tau_cooling: f64,
    pub tau_warming: f64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub saves_count: u64,
    pub corruption_recoveries: u64,
    pub schema_version: String,
}

impl Snapshot {
    pub fn to_value(&self) -> ThermalResult<Value> {
        serde_json::to_value(self).map_err(|e| {
            SnapshotError::EncodeFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Everything recovered from a persisted document, defaults substituted.
#[derive(Debug, Clone)]
pub(crate) struct RestoredSnapshot {
    pub state: ThermalState,
    pub last_transition: DateTime<Utc>,
    pub priming_start_time: Option<DateTime<Utc>>,
    /// `None` when absent or corrupt; the caller keeps its running value.
    pub tau_cooling: Option<f64>,
    pub tau_warming: Option<f64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub probes: Vec<ProbeResult>,
    pub saves_count: Option<u64>,
    pub stored_recoveries: Option<u64>,
    /// Corrupt fields replaced during this read.
    pub recoveries: u64,
}

/// Read a snapshot document, recovering field by field.
///
/// Missing fields (older snapshots) take defaults silently. Present but
/// invalid fields take defaults and count as a recovery. Model fields have
/// no default here: the running model keeps its values.
pub(crate) fn read_snapshot(data: &Value, now: DateTime<Utc>) -> RestoredSnapshot {
    let mut out = RestoredSnapshot {
        state: ThermalState::Priming,
        last_transition: now,
        priming_start_time: None,
        tau_cooling: None,
        tau_warming: None,
        last_modified: None,
        probes: Vec::new(),
        saves_count: None,
        stored_recoveries: None,
        recoveries: 0,
    };

    if !data.is_object() {
        out.recover("snapshot", &SnapshotError::NotAnObject.to_string());
        return out;
    }

    match data.get("version").and_then(Value::as_str) {
        Some(SNAPSHOT_VERSION) | None => {}
        Some(other) => warn!(version = other, "snapshot version differs, reading best effort"),
    }

    let state = data.get("state");
    match state.and_then(|s| s.get("current_state")) {
        None | Some(Value::Null) => {}
        Some(Value::String(raw)) => match raw.parse::<ThermalState>() {
            Ok(parsed) => out.state = parsed,
            Err(err) => out.recover("state.current_state", &err.to_string()),
        },
        Some(other) => out.recover("state.current_state", &format!("expected a string, got {other}")),
    }
    if let Some(ts) = out.timestamp(state, "last_transition", "state.last_transition") {
        out.last_transition = ts;
    }
    if out.state == ThermalState::Priming {
        out.priming_start_time = out.timestamp(state, "priming_start_time", "state.priming_start_time");
    }

    let model = data.get("model");
    out.tau_cooling = out.tau(model, "tau_cooling");
    out.tau_warming = out.tau(model, "tau_warming");
    out.last_modified = out.timestamp(model, "last_modified", "model.last_modified");

    match data.get("confidence") {
        None | Some(Value::Null) => {}
        Some(value) => {
            if !value.as_f64().is_some_and(|c| (0.0..=1.0).contains(&c)) {
                out.recover("confidence", &format!("out of range: {value}"));
            }
        }
    }

    match data.get("probe_history") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for (idx, entry) in entries.iter().enumerate() {
                match parse_probe(entry, now) {
                    Ok(probe) => out.probes.push(probe),
                    Err(err) => out.recover(&format!("probe_history[{idx}]"), &err.to_string()),
                }
            }
        }
        Some(_) => out.recover("probe_history", "expected an array"),
    }

    let metadata = data.get("metadata");
    out.saves_count = metadata.and_then(|m| m.get("saves_count")).and_then(Value::as_u64);
    out.stored_recoveries = metadata
        .and_then(|m| m.get("corruption_recoveries"))
        .and_then(Value::as_u64);

    out
}

impl RestoredSnapshot {
    fn recover(&mut self, field: &str, detail: &str) {
        self.recoveries += 1;
        events::corruption_recovered(field, detail);
    }

    fn tau(&mut self, section: Option<&Value>, key: &str) -> Option<f64> {
        match section.and_then(|s| s.get(key)) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_f64().filter(|t| is_plausible_tau(*t)) {
                Some(tau) => Some(tau),
                None => {
                    self.recover(&format!("model.{key}"), &format!("implausible tau {value}"));
                    None
                }
            },
        }
    }

    fn timestamp(&mut self, section: Option<&Value>, key: &str, field: &str) -> Option<DateTime<Utc>> {
        match section.and_then(|s| s.get(key)) {
            None | Some(Value::Null) => None,
            Some(value) => match parse_timestamp(value) {
                Ok(ts) => Some(ts),
                Err(err) => {
                    self.recover(field, &err.to_string());
                    None
                }
            },
        }
    }
}

fn is_plausible_tau(tau: f64) -> bool {
    tau.is_finite() && tau > 0.0 && tau < MAX_PLAUSIBLE_TAU
}

/// RFC 3339, or a naive ISO-8601 datetime taken as UTC.
pub(crate) fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, SnapshotError> {
    let Some(raw) = value.as_str() else {
        return Err(SnapshotError::InvalidTimestamp {
            value: value.to_string(),
            reason: "not a string".to_string(),
        });
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| SnapshotError::InvalidTimestamp {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn invalid(field: &str, reason: impl Into<String>) -> SnapshotError {
    SnapshotError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Validate one persisted probe. Legacy entries without a timestamp get `now`.
pub(crate) fn parse_probe(entry: &Value, now: DateTime<Utc>) -> Result<ProbeResult, SnapshotError> {
    if !entry.is_object() {
        return Err(SnapshotError::NotAnObject);
    }
    let number = |key: &str| entry.get(key).and_then(Value::as_f64);

    let tau = number("tau_value")
        .filter(|t| is_plausible_tau(*t))
        .ok_or_else(|| invalid("tau_value", "missing or implausible"))?;
    let confidence = number("confidence")
        .filter(|c| (0.0..=1.0).contains(c))
        .ok_or_else(|| invalid("confidence", "missing or outside 0..=1"))?;
    let duration = number("duration")
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| invalid("duration", "missing or not positive"))?;
    let fit_quality = number("fit_quality").filter(|f| f.is_finite()).unwrap_or(0.0);
    let aborted = entry.get("aborted").and_then(Value::as_bool).unwrap_or(false);

    let timestamp = match entry.get("timestamp") {
        None | Some(Value::Null) => now,
        Some(value) => parse_timestamp(value)?,
    };

    let mut probe = ProbeResult::new(tau, confidence, duration.round() as i64, fit_quality, aborted)
        .with_timestamp(timestamp)
        .with_outdoor_temp(number("outdoor_temp").filter(|t| t.is_finite()));
    if let Some(is_cooling) = entry.get("is_cooling").and_then(Value::as_bool) {
        probe = probe.with_direction(is_cooling);
    }
    if entry.get("passive").and_then(Value::as_bool).unwrap_or(false) {
        probe = probe.as_passive();
    }
    Ok(probe)
}
