//! # thermal-state
//!
//! The thermal learning state machine.
//!
//! [`ThermalManager`] owns the model, the optional probe scheduler, and the
//! per-state data, dispatches each tick to the active [`StateHandler`], and
//! persists/restores itself as a versioned JSON snapshot.

pub mod context;
pub mod handlers;
pub mod manager;
pub mod phase;
pub mod snapshot;

pub use context::{OperatingWindow, ThermalContext};
pub use handlers::{handler_for, StateHandler};
pub use manager::ThermalManager;
pub use phase::PhaseData;
pub use snapshot::Snapshot;
