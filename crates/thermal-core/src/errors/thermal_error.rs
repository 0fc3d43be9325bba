use super::{ConfigError, SnapshotError};

/// Top-level error for the thermal learning system.
#[derive(Debug, thiserror::Error)]
pub enum ThermalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("unknown thermal state: {value}")]
    UnknownState { value: String },

    #[error("unknown hvac mode: {value}")]
    UnknownHvacMode { value: String },

    #[error("unknown learning profile: {value}")]
    UnknownProfile { value: String },

    #[error("notification delivery failed: {reason}")]
    NotificationFailed { reason: String },
}
