mod notification;
mod persistence;
mod state_provider;

pub use notification::{NotificationAction, NotificationSender};
pub use persistence::PersistCallback;
pub use state_provider::{EntityState, StateProvider};
