//! # thermal-model
//!
//! Passive thermal model for a single zone.
//! Keeps a bounded, confidence-weighted probe history and derives cooling and
//! warming time constants from it with age decay. Also hosts the exponential
//! curve fit used to turn a temperature series into a tau, and the stability
//! detector that finds natural drift events for passive learning.

pub mod analysis;
pub mod model;
pub mod stability;

pub use analysis::{fit_exponential, DecayFit, Sample};
pub use model::PassiveThermalModel;
pub use stability::{DriftEvent, StabilityDetector};
