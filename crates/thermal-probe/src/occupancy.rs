//! Occupancy fallback hierarchy used to judge whether now is an opportune time.
//!
//! presence entity (authoritative when known) → calendar (busy = away at work)
//! → manual override boolean → not opportune.

use thermal_core::traits::{EntityState, StateProvider};
use tracing::debug;

const PRESENT_STATES: [&str; 4] = ["home", "on", "occupied", "detected"];

/// Which signal decided the opportune-time check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancySource {
    Presence,
    Calendar,
    ManualOverride,
    NoSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpportuneCheck {
    pub opportune: bool,
    pub source: OccupancySource,
}

/// Entity ids consulted by the hierarchy. Any of them may be unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct OccupancyEntities<'a> {
    pub presence: Option<&'a str>,
    pub calendar: Option<&'a str>,
    pub manual_override: Option<&'a str>,
}

/// True when a presence-style entity says somebody is home.
///
/// Person entities report a zone name when away, so anything that is not a
/// known "present" state counts as away.
pub fn is_present(state: &EntityState) -> bool {
    PRESENT_STATES.contains(&state.state.trim().to_ascii_lowercase().as_str())
}

fn is_on(state: &EntityState) -> bool {
    state.state.trim().eq_ignore_ascii_case("on")
}

pub fn check_opportune(provider: &dyn StateProvider, entities: OccupancyEntities<'_>) -> OpportuneCheck {
    if let Some(presence) = entities.presence.and_then(|id| provider.get_available_state(id)) {
        let opportune = !is_present(&presence);
        debug!(state = %presence.state, opportune, "opportune time decided by presence");
        return OpportuneCheck {
            opportune,
            source: OccupancySource::Presence,
        };
    }

    if let Some(calendar) = entities.calendar.and_then(|id| provider.get_available_state(id)) {
        if is_on(&calendar) {
            debug!("calendar busy, treating as away");
            return OpportuneCheck {
                opportune: true,
                source: OccupancySource::Calendar,
            };
        }
    }

    if let Some(manual) = entities.manual_override.and_then(|id| provider.get_available_state(id)) {
        if is_on(&manual) {
            debug!("manual override allows probing");
            return OpportuneCheck {
                opportune: true,
                source: OccupancySource::ManualOverride,
            };
        }
    }

    OpportuneCheck {
        opportune: false,
        source: OccupancySource::NoSignal,
    }
}
