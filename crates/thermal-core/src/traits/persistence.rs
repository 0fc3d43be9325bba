use std::sync::Arc;

/// Zero-argument trigger invoked after every tau update.
///
/// The collaborator schedules the actual save; the core never waits on it.
pub type PersistCallback = Arc<dyn Fn() + Send + Sync>;
