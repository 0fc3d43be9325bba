use chrono::{Duration, TimeZone, Utc};
use thermal_model::StabilityDetector;

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap()
}

#[test]
fn stable_when_recent_readings_are_flat() {
    let mut detector = StabilityDetector::new();
    for i in 0..6 {
        detector.add_reading(t0() + Duration::minutes(i * 2), 21.0 + (i % 2) as f64 * 0.05, true);
    }
    assert!(detector.is_stable(t0() + Duration::minutes(10)));
}

#[test]
fn unstable_when_temperature_moves_or_data_is_thin() {
    let mut detector = StabilityDetector::new();
    assert!(!detector.is_stable(t0()));

    for i in 0..6 {
        detector.add_reading(t0() + Duration::minutes(i * 2), 21.0 + i as f64 * 0.1, true);
    }
    assert!(!detector.is_stable(t0() + Duration::minutes(10)));
}

#[test]
fn closed_idle_run_becomes_drift_event() {
    let mut detector = StabilityDetector::new();
    detector.add_reading(t0(), 22.0, false);
    for i in 1..=18 {
        let t = (i * 5) as f64;
        detector.add_reading(t0() + Duration::minutes(i * 5), 16.0 + 6.0 * (-t / 90.0).exp(), true);
    }
    assert!(detector.find_drift_event().is_none(), "run is still open");

    detector.add_reading(t0() + Duration::minutes(95), 18.5, false);
    let event = detector.find_drift_event().unwrap();
    assert_eq!(event.samples.len(), 18);
    assert_eq!(event.duration(), Duration::minutes(85));

    // Consumed: the same run is not reported twice.
    assert!(detector.find_drift_event().is_none());
}

#[test]
fn short_or_flat_idle_runs_are_discarded() {
    let mut detector = StabilityDetector::new();
    for i in 0..5 {
        detector.add_reading(t0() + Duration::minutes(i * 5), 21.0 - i as f64 * 0.2, true);
    }
    detector.add_reading(t0() + Duration::minutes(30), 20.0, false);
    assert!(detector.find_drift_event().is_none());
    assert_eq!(detector.len(), 1);
}

#[test]
fn backward_clock_jump_clears_buffer() {
    let mut detector = StabilityDetector::new();
    detector.add_reading(t0(), 21.0, true);
    detector.add_reading(t0() + Duration::minutes(5), 21.0, true);
    detector.add_reading(t0() - Duration::hours(1), 21.0, true);
    assert_eq!(detector.len(), 1);

    detector.add_reading(t0(), f64::NAN, true);
    assert_eq!(detector.len(), 1, "non-finite readings are dropped");
}
