use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ThermalError;

/// The six phases of the thermal state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermalState {
    /// Initial learning period after installation.
    Priming,
    /// HVAC idle, temperature allowed to drift inside the comfort band.
    Drifting,
    /// HVAC actively pulling temperature back into the band.
    Correcting,
    /// Gradual return to normal targets after a disturbance.
    Recovery,
    /// Active calibration probe in progress.
    Probing,
    /// Tight-band measurement window for clean offset reads.
    Calibrating,
}

impl ThermalState {
    pub const ALL: [ThermalState; 6] = [
        ThermalState::Priming,
        ThermalState::Drifting,
        ThermalState::Correcting,
        ThermalState::Recovery,
        ThermalState::Probing,
        ThermalState::Calibrating,
    ];

    /// Lowercase name used in snapshots and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priming => "priming",
            Self::Drifting => "drifting",
            Self::Correcting => "correcting",
            Self::Recovery => "recovery",
            Self::Probing => "probing",
            Self::Calibrating => "calibrating",
        }
    }

    /// States from which the probe scheduler may start an opportunistic probe.
    pub fn allows_opportunistic_probe(self) -> bool {
        matches!(self, Self::Drifting | Self::Correcting)
    }
}

impl fmt::Display for ThermalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThermalState {
    type Err = ThermalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ThermalState::ALL
            .into_iter()
            .find(|state| state.as_str() == needle)
            .ok_or_else(|| ThermalError::UnknownState { value: s.to_string() })
    }
}

/// HVAC operating mode as reported by the wrapped climate entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    #[default]
    Off,
    Heat,
    Cool,
    HeatCool,
    Auto,
    Dry,
    FanOnly,
}

impl HvacMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::HeatCool => "heat_cool",
            Self::Auto => "auto",
            Self::Dry => "dry",
            Self::FanOnly => "fan_only",
        }
    }

    /// Probe direction inferred from the mode: only `cool` counts as cooling.
    pub fn is_cooling(self) -> bool {
        self == Self::Cool
    }

    /// Whether the HVAC is doing anything at all.
    pub fn is_active(self) -> bool {
        self != Self::Off
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ThermalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "heat" => Ok(Self::Heat),
            "cool" => Ok(Self::Cool),
            "heat_cool" => Ok(Self::HeatCool),
            "auto" => Ok(Self::Auto),
            "dry" => Ok(Self::Dry),
            "fan_only" => Ok(Self::FanOnly),
            _ => Err(ThermalError::UnknownHvacMode { value: s.to_string() }),
        }
    }
}
