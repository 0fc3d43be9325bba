use chrono::{TimeZone, Utc};
use thermal_core::models::*;
use thermal_core::traits::EntityState;
use thermal_core::ThermalError;

#[test]
fn thermal_state_parses_lowercase_names() {
    for state in ThermalState::ALL {
        let parsed: ThermalState = state.as_str().parse().unwrap();
        assert_eq!(parsed, state);
    }
    assert_eq!("DRIFTING".parse::<ThermalState>().unwrap(), ThermalState::Drifting);
}

#[test]
fn thermal_state_rejects_unknown_name() {
    let err = "hibernating".parse::<ThermalState>().unwrap_err();
    assert!(matches!(err, ThermalError::UnknownState { ref value } if value == "hibernating"));
    assert!(err.to_string().contains("hibernating"));
}

#[test]
fn thermal_state_serializes_lowercase() {
    let json = serde_json::to_string(&ThermalState::Calibrating).unwrap();
    assert_eq!(json, "\"calibrating\"");
}

#[test]
fn only_drifting_and_correcting_allow_opportunistic_probes() {
    let allowed: Vec<_> = ThermalState::ALL
        .into_iter()
        .filter(|s| s.allows_opportunistic_probe())
        .collect();
    assert_eq!(allowed, vec![ThermalState::Drifting, ThermalState::Correcting]);
}

#[test]
fn hvac_mode_direction() {
    assert!(HvacMode::Cool.is_cooling());
    assert!(!HvacMode::Heat.is_cooling());
    assert!(!HvacMode::HeatCool.is_cooling());
    assert!(!HvacMode::Off.is_active());
    assert_eq!("fan_only".parse::<HvacMode>().unwrap(), HvacMode::FanOnly);
    assert!("blast".parse::<HvacMode>().is_err());
}

#[test]
fn probe_result_builders_and_validity() {
    let ts = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let probe = ProbeResult::new(95.0, 0.8, 3600, 0.9, false)
        .with_timestamp(ts)
        .with_outdoor_temp(Some(4.5))
        .with_direction(true);

    assert_eq!(probe.timestamp, ts);
    assert_eq!(probe.outdoor_temp, Some(4.5));
    assert!(probe.applies_to(true));
    assert!(!probe.applies_to(false));
    assert!(probe.is_valid());

    let untagged = ProbeResult::new(95.0, 0.8, 3600, 0.9, false);
    assert!(untagged.applies_to(true) && untagged.applies_to(false));

    assert!(!ProbeResult::new(-1.0, 0.8, 3600, 0.9, false).is_valid());
    assert!(!ProbeResult::new(90.0, 1.2, 3600, 0.9, false).is_valid());
    assert!(!ProbeResult::new(90.0, 0.8, 0, 0.9, false).is_valid());
}

#[test]
fn legacy_probe_json_without_optional_fields_deserializes() {
    let json = r#"{"tau_value":90.0,"confidence":0.7,"duration":1800,"fit_quality":0.8,"aborted":false,"timestamp":"2026-03-01T10:00:00Z"}"#;
    let probe: ProbeResult = serde_json::from_str(json).unwrap();
    assert!(probe.outdoor_temp.is_none());
    assert!(probe.is_cooling.is_none());
}

#[test]
fn profiles_differ_in_eagerness() {
    let comfort = ProfileConfig::for_profile(LearningProfile::Comfort);
    let aggressive = ProfileConfig::for_profile(LearningProfile::Aggressive);
    assert!(comfort.min_probe_interval_hours > aggressive.min_probe_interval_hours);
    assert!(comfort.max_probe_interval_days > aggressive.max_probe_interval_days);
    assert!(comfort.information_gain_threshold > aggressive.information_gain_threshold);
    assert!(!aggressive.presence_override_required);
    assert_eq!(comfort.outdoor_temp_bins, vec![-10.0, 0.0, 10.0, 20.0, 30.0]);
}

#[test]
fn preference_levels_widen_comfort_band() {
    let levels = [
        PreferenceLevel::MaxComfort,
        PreferenceLevel::ComfortPriority,
        PreferenceLevel::Balanced,
        PreferenceLevel::SavingsPriority,
        PreferenceLevel::MaxSavings,
    ];
    for pair in levels.windows(2) {
        assert!(pair[0].comfort_band() < pair[1].comfort_band());
    }
    assert_eq!(PreferenceLevel::Balanced.probe_drift(), 2.0);
}

#[test]
fn entity_state_availability_and_numbers() {
    assert!(!EntityState::new("unavailable").is_available());
    assert!(!EntityState::new("Unknown").is_available());
    assert!(EntityState::new("home").is_available());

    let weather = EntityState::new("sunny")
        .with_attribute("temperature", 12.5)
        .with_attribute("humidity", "61");
    assert_eq!(weather.attribute_f64("temperature"), Some(12.5));
    assert_eq!(weather.attribute_f64("humidity"), Some(61.0));
    assert_eq!(weather.attribute_f64("missing"), None);
    assert_eq!(EntityState::new("18.25").numeric_state(), Some(18.25));
    assert_eq!(weather.numeric_state(), None);
}
