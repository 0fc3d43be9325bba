//! Structured log events for key thermal operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a state machine transition.
pub fn state_transition(from: &str, to: &str, trigger: &str) {
    tracing::info!(
        event = "state_transition",
        from = %from,
        to = %to,
        trigger = %trigger,
        "thermal state transition"
    );
}

/// Log a probe committed to the model.
pub fn probe_recorded(tau: f64, confidence: f64, aborted: bool, is_cooling: bool) {
    tracing::info!(
        event = "probe_recorded",
        tau = tau,
        confidence = confidence,
        aborted = aborted,
        is_cooling = is_cooling,
        "probe recorded"
    );
}

/// Log a probe being abandoned.
pub fn probe_aborted(reason: &str, salvaged: bool) {
    tracing::warn!(
        event = "probe_aborted",
        reason = %reason,
        salvaged = salvaged,
        "probe aborted"
    );
}

/// Log a recovered field in persisted data.
pub fn corruption_recovered(field: &str, detail: &str) {
    tracing::warn!(
        event = "corruption_recovered",
        field = %field,
        detail = %detail,
        "corrupt persisted value replaced with default"
    );
}

/// Log a notification the collaborator failed to deliver.
pub fn notification_failed(title: &str, error: &str) {
    tracing::warn!(
        event = "notification_failed",
        title = %title,
        error = %error,
        "notification delivery failed"
    );
}
