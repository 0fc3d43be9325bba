mod config_error;
mod snapshot_error;
mod thermal_error;

pub use config_error::ConfigError;
pub use snapshot_error::SnapshotError;
pub use thermal_error::ThermalError;

/// Convenience alias used across every thermal crate.
pub type ThermalResult<T> = Result<T, ThermalError>;
