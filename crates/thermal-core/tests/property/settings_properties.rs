use proptest::prelude::*;
use thermal_core::models::{AdvancedSettings, ThermalConstants, ThermalState};

/// Strictly ascending boundaries inside -40..=60 °C.
fn ascending_bins() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(-40i32..=60, 1..8)
        .prop_map(|set| set.into_iter().map(f64::from).collect())
}

proptest! {
    #[test]
    fn sorted_in_range_bins_always_validate(
        bins in ascending_bins(),
        min_hours in 1u32..=23,
        max_days in 1u32..=30,
        gain in 0.0f64..=1.0,
    ) {
        let settings = AdvancedSettings {
            temperature_bins: bins,
            min_probe_interval_hours: min_hours,
            max_probe_interval_days: max_days,
            information_gain_threshold: gain,
            ..Default::default()
        };
        prop_assert!(settings.validate().is_ok());
    }

    #[test]
    fn reversed_bins_never_validate(bins in ascending_bins().prop_filter("two or more", |b| b.len() > 1)) {
        let settings = AdvancedSettings {
            temperature_bins: bins.into_iter().rev().collect(),
            ..Default::default()
        };
        prop_assert!(settings.validate().is_err());
    }

    #[test]
    fn state_names_parse_in_any_case(idx in 0usize..6, upper in any::<bool>()) {
        let state = ThermalState::ALL[idx];
        let name = if upper { state.as_str().to_uppercase() } else { state.as_str().to_string() };
        prop_assert_eq!(name.parse::<ThermalState>().ok(), Some(state));
    }

    #[test]
    fn phase_durations_never_panic_and_stay_bounded(secs in any::<i64>()) {
        let constants = ThermalConstants {
            priming_duration: secs,
            probe_max_duration: secs,
            ..Default::default()
        };
        prop_assert!(constants.priming().num_seconds() >= 0);
        prop_assert!(constants.probe_max().num_days() <= 365);
    }
}
