/// Errors raised while encoding or decoding a persisted thermal snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {reason}")]
    EncodeFailed { reason: String },

    #[error("snapshot is not a JSON object")]
    NotAnObject,

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("invalid snapshot field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}
