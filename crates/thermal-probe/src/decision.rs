use std::fmt;

/// Why the scheduler decided the way it did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionReason {
    MaxIntervalExceeded,
    MinIntervalNotMet,
    QuietHours,
    NotOpportune,
    LowInformationGain { gain: f64, threshold: f64 },
    Ready { gain: f64 },
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxIntervalExceeded => f.write_str("Forced - Maximum Interval Exceeded"),
            Self::MinIntervalNotMet => f.write_str("Blocked - Minimum Interval Not Met"),
            Self::QuietHours => f.write_str("Blocked - Quiet Hours"),
            Self::NotOpportune => f.write_str("Blocked - User Present"),
            Self::LowInformationGain { .. } => f.write_str("Blocked - Low Information Gain"),
            Self::Ready { .. } => f.write_str("Ready - Probe Recommended"),
        }
    }
}

/// Outcome of one scheduler evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeDecision {
    pub should_probe: bool,
    pub reason: DecisionReason,
}

impl ProbeDecision {
    pub fn probe(reason: DecisionReason) -> Self {
        Self {
            should_probe: true,
            reason,
        }
    }

    pub fn block(reason: DecisionReason) -> Self {
        Self {
            should_probe: false,
            reason,
        }
    }
}
