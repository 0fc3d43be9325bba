use std::fmt;

use chrono::{DateTime, Utc};

/// Conditions that end a running probe early.
#[derive(Debug, Clone, PartialEq)]
pub enum AbortReason {
    /// Presence flipped to occupied.
    UserReturned,
    /// Outdoor temperature moved too far since the probe started.
    OutdoorTempChanged { delta: f64 },
    /// Somebody changed the target temperature mid-probe.
    TargetChanged { delta: f64 },
    /// The wrapped HVAC entity went unavailable/unknown.
    HvacFault { state: String },
    /// Raised by the state machine itself (e.g. the probe ran too long).
    Internal { detail: String },
}

impl AbortReason {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal { detail: detail.into() }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserReturned => f.write_str("user returned home"),
            Self::OutdoorTempChanged { delta } => {
                write!(f, "outdoor temperature changed by {delta:.1}°C")
            }
            Self::TargetChanged { delta } => {
                write!(f, "target temperature changed by {delta:.1}°C")
            }
            Self::HvacFault { state } => write!(f, "hvac entity reported {state}"),
            Self::Internal { detail } => f.write_str(detail),
        }
    }
}

/// Conditions captured when a probe starts, compared against on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeWatch {
    pub started_at: DateTime<Utc>,
    pub start_outdoor_temp: Option<f64>,
    pub start_target_temp: Option<f64>,
    /// Somebody was home when the probe started. Only a flip to present aborts.
    pub start_occupied: bool,
}

impl ProbeWatch {
    pub fn new(started_at: DateTime<Utc>, start_outdoor_temp: Option<f64>, start_target_temp: Option<f64>) -> Self {
        Self {
            started_at,
            start_outdoor_temp,
            start_target_temp,
            start_occupied: false,
        }
    }

    pub fn with_occupied(mut self, occupied: bool) -> Self {
        self.start_occupied = occupied;
        self
    }
}
