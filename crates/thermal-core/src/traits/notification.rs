use serde::{Deserialize, Serialize};

use crate::errors::ThermalResult;

/// An action button attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// Fire-and-forget notification sink.
///
/// Failures are reported through the result, but the core only logs them.
pub trait NotificationSender: Send + Sync {
    fn send(
        &self,
        title: &str,
        message: &str,
        persistent: bool,
        actions: Option<&[NotificationAction]>,
    ) -> ThermalResult<()>;
}
