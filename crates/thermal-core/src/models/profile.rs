use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_OUTDOOR_TEMP_BINS;
use crate::errors::ThermalError;

/// User comfort-versus-savings preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceLevel {
    MaxComfort,
    ComfortPriority,
    #[default]
    Balanced,
    SavingsPriority,
    MaxSavings,
}

impl PreferenceLevel {
    /// Half-width of the comfort band around the setpoint (°C).
    pub fn comfort_band(self) -> f64 {
        match self {
            Self::MaxComfort => 0.5,
            Self::ComfortPriority => 0.8,
            Self::Balanced => 1.2,
            Self::SavingsPriority => 1.5,
            Self::MaxSavings => 2.0,
        }
    }

    /// Half-width of the band tolerated while a probe runs (°C).
    pub fn probe_drift(self) -> f64 {
        2.0
    }
}

/// Preset controlling how eagerly probes are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningProfile {
    Comfort,
    #[default]
    Balanced,
    Aggressive,
    Custom,
}

impl LearningProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comfort => "comfort",
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for LearningProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningProfile {
    type Err = ThermalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comfort" => Ok(Self::Comfort),
            "balanced" => Ok(Self::Balanced),
            "aggressive" => Ok(Self::Aggressive),
            "custom" => Ok(Self::Custom),
            _ => Err(ThermalError::UnknownProfile { value: s.to_string() }),
        }
    }
}

/// Scheduling parameters selected by a [`LearningProfile`].
///
/// Treated as an immutable snapshot: switching profile or applying advanced
/// settings replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub profile: LearningProfile,
    /// Probes closer together than this are refused.
    pub min_probe_interval_hours: u32,
    /// Probes further apart than this are forced.
    pub max_probe_interval_days: u32,
    /// Only probe while nobody is home.
    pub presence_override_required: bool,
    /// Minimum information gain for a probe to be worthwhile.
    pub information_gain_threshold: f64,
    /// Respect quiet hours.
    pub quiet_hours_enabled: bool,
    /// Static outdoor temperature bin boundaries (°C), ascending.
    pub outdoor_temp_bins: Vec<f64>,
}

impl ProfileConfig {
    /// The preset for a profile. `Custom` starts from the balanced preset.
    pub fn for_profile(profile: LearningProfile) -> Self {
        let bins = DEFAULT_OUTDOOR_TEMP_BINS.to_vec();
        match profile {
            LearningProfile::Comfort => Self {
                profile,
                min_probe_interval_hours: 48,
                max_probe_interval_days: 14,
                presence_override_required: true,
                information_gain_threshold: 0.6,
                quiet_hours_enabled: true,
                outdoor_temp_bins: bins,
            },
            LearningProfile::Balanced | LearningProfile::Custom => Self {
                profile,
                min_probe_interval_hours: 24,
                max_probe_interval_days: 7,
                presence_override_required: true,
                information_gain_threshold: 0.5,
                quiet_hours_enabled: true,
                outdoor_temp_bins: bins,
            },
            LearningProfile::Aggressive => Self {
                profile,
                min_probe_interval_hours: 12,
                max_probe_interval_days: 3,
                presence_override_required: false,
                information_gain_threshold: 0.3,
                quiet_hours_enabled: false,
                outdoor_temp_bins: bins,
            },
        }
    }

    pub fn min_interval(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.min_probe_interval_hours))
    }

    pub fn max_interval(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.max_probe_interval_days))
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self::for_profile(LearningProfile::default())
    }
}
