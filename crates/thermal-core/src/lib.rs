//! # thermal-core
//!
//! Foundation crate for the thermal learning system.
//! Defines the data types, collaborator traits, errors, config, and constants
//! shared by the model, the probe scheduler, and the state machine.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::ThermalConfig;
pub use errors::{ConfigError, ThermalError, ThermalResult};
pub use models::{
    AdvancedSettings, HvacMode, LearningProfile, PreferenceLevel, ProbeResult, ProfileConfig,
    ThermalConstants, ThermalState,
};
pub use traits::{EntityState, NotificationSender, PersistCallback, StateProvider};
