use chrono::NaiveTime;
use thermal_core::models::AdvancedSettings;
use thermal_core::ConfigError;

fn violations(settings: &AdvancedSettings) -> Vec<String> {
    match settings.validate() {
        Ok(()) => Vec::new(),
        Err(ConfigError::ValidationFailed { violations }) => violations,
        Err(other) => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn default_settings_are_valid() {
    assert!(AdvancedSettings::default().validate().is_ok());
}

#[test]
fn min_interval_must_be_shorter_than_max_interval() {
    let settings = AdvancedSettings {
        min_probe_interval_hours: 72,
        max_probe_interval_days: 2,
        ..Default::default()
    };
    let v = violations(&settings);
    assert_eq!(v.len(), 1);
    assert!(v[0].contains("shorter"));
}

#[test]
fn quiet_hours_must_differ() {
    let t = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
    let settings = AdvancedSettings {
        quiet_hours_start: t,
        quiet_hours_end: t,
        ..Default::default()
    };
    assert!(violations(&settings)[0].contains("quiet_hours"));
}

#[test]
fn bins_must_be_sorted_and_in_range() {
    let unsorted = AdvancedSettings {
        temperature_bins: vec![0.0, -10.0, 10.0],
        ..Default::default()
    };
    assert!(violations(&unsorted).iter().any(|v| v.contains("ascending")));

    let out_of_range = AdvancedSettings {
        temperature_bins: vec![-50.0, 0.0, 70.0],
        ..Default::default()
    };
    assert!(violations(&out_of_range).iter().any(|v| v.contains("-40")));
}

#[test]
fn all_violations_are_reported_together() {
    let settings = AdvancedSettings {
        min_probe_interval_hours: 0,
        information_gain_threshold: 1.5,
        outdoor_temp_change_threshold: 0.1,
        min_probe_duration_minutes: 1,
        temperature_bins: vec![],
        ..Default::default()
    };
    let v = violations(&settings);
    assert_eq!(v.len(), 5, "got {v:?}");
    let err = settings.validate().unwrap_err().to_string();
    assert!(err.contains("information_gain_threshold"));
    assert!(err.contains("min_probe_duration_minutes"));
}
