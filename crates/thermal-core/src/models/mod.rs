mod constants;
mod probe;
mod profile;
mod settings;
mod state;

pub use constants::ThermalConstants;
pub use probe::ProbeResult;
pub use profile::{LearningProfile, PreferenceLevel, ProfileConfig};
pub use settings::AdvancedSettings;
pub use state::{HvacMode, ThermalState};
