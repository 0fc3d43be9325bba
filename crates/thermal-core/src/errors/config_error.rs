/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {message}")]
    ParseError { message: String },

    #[error("invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Every violated constraint, so a rejected update reports all problems at once.
    #[error("config validation failed: {}", violations.join("; "))]
    ValidationFailed { violations: Vec<String> },
}

impl ConfigError {
    /// Build a `ValidationFailed` from collected violations, or `None` if there were none.
    pub fn from_violations(violations: Vec<String>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self::ValidationFailed { violations })
        }
    }
}
