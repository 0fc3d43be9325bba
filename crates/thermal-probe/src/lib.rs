//! # thermal-probe
//!
//! Decides when a calibration probe is both safe and worth running.
//!
//! Checks run in a fixed order and stop at the first decisive one:
//! maximum interval (forces a probe), minimum interval, quiet hours,
//! occupancy, information gain. Also watches running probes for abort
//! conditions and salvages partial data from aborted ones.

pub mod abort;
pub mod binning;
pub mod decision;
pub mod occupancy;
pub mod quiet_hours;
pub mod scheduler;

pub use abort::{AbortReason, ProbeWatch};
pub use decision::{DecisionReason, ProbeDecision};
pub use quiet_hours::QuietHours;
pub use scheduler::ProbeScheduler;
