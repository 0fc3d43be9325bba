use chrono::{Duration, TimeZone, Utc};
use thermal_core::models::ProbeResult;
use thermal_model::PassiveThermalModel;

fn probe_at(tau: f64, confidence: f64, days_ago: i64) -> ProbeResult {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
    ProbeResult::new(tau, confidence, 3600, 0.9, false).with_timestamp(now - Duration::days(days_ago))
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

// ── Weights ──────────────────────────────────────────────────────────────

#[test]
fn fresh_probe_weight_equals_its_confidence() {
    let model = PassiveThermalModel::default();
    let probe = probe_at(90.0, 0.8, 0);
    let w = model.decay_weight(&probe, fixed_now());
    assert!((w - 0.8).abs() < 1e-9);
}

#[test]
fn weight_halves_after_about_34_days() {
    let model = PassiveThermalModel::default();
    let now = fixed_now();
    let fresh = ProbeResult::new(90.0, 1.0, 3600, 0.9, false).with_timestamp(now);
    let old = ProbeResult::new(90.0, 1.0, 3600, 0.9, false)
        .with_timestamp(now - Duration::minutes((34.3 * 24.0 * 60.0) as i64));

    let ratio = model.decay_weight(&old, now) / model.decay_weight(&fresh, now);
    assert!((ratio - 0.5).abs() < 0.025, "ratio was {ratio}");
}

#[test]
fn future_probes_count_as_fresh() {
    let model = PassiveThermalModel::default();
    let probe = ProbeResult::new(90.0, 0.6, 3600, 0.9, false).with_timestamp(fixed_now() + Duration::days(2));
    assert!((model.decay_weight(&probe, fixed_now()) - 0.6).abs() < 1e-9);
}

// ── Tau updates ──────────────────────────────────────────────────────────

#[test]
fn defaults_before_any_probe() {
    let model = PassiveThermalModel::default();
    assert_eq!(model.tau_cooling(), 90.0);
    assert_eq!(model.tau_warming(), 150.0);
    assert_eq!(model.get_confidence(), 0.0);
    assert!(model.calculate_weighted_tau(true).is_none());
    assert!(model.last_probe_time().is_none());
}

#[test]
fn single_probe_sets_tau_for_its_direction_only() {
    let mut model = PassiveThermalModel::default();
    model.update_tau_at(probe_at(120.0, 0.9, 0), true, fixed_now());

    assert!((model.tau_cooling() - 120.0).abs() < 1e-9);
    assert_eq!(model.tau_warming(), 150.0);
    assert_eq!(model.probe_history()[0].is_cooling, Some(true));
}

#[test]
fn weighted_average_respects_confidence() {
    let mut model = PassiveThermalModel::default();
    let now = fixed_now();
    model.update_tau_at(probe_at(100.0, 1.0, 0), false, now);
    model.update_tau_at(probe_at(200.0, 0.5, 0), false, now);

    // (1.0×100 + 0.5×200) / 1.5
    assert!((model.tau_warming() - 133.333_333).abs() < 1e-4);
}

#[test]
fn older_probes_weigh_less() {
    let mut model = PassiveThermalModel::default();
    let now = fixed_now();
    model.update_tau_at(probe_at(60.0, 1.0, 60), true, now);
    model.update_tau_at(probe_at(120.0, 1.0, 0), true, now);

    assert!(model.tau_cooling() > 90.0, "recent probe should dominate, got {}", model.tau_cooling());
}

#[test]
fn untagged_legacy_probes_apply_to_both_directions() {
    let mut model = PassiveThermalModel::default();
    model.extend_history(vec![probe_at(80.0, 1.0, 1)]);

    let now = fixed_now();
    assert!((model.calculate_weighted_tau_at(true, now).unwrap() - 80.0).abs() < 1e-9);
    assert!((model.calculate_weighted_tau_at(false, now).unwrap() - 80.0).abs() < 1e-9);
}

#[test]
fn zero_confidence_probe_leaves_tau_unchanged() {
    let mut model = PassiveThermalModel::default();
    model.update_tau_at(probe_at(40.0, 0.0, 0), true, fixed_now());
    assert_eq!(model.tau_cooling(), 90.0);
    assert_eq!(model.probe_count(), 1);
}

// ── History ──────────────────────────────────────────────────────────────

#[test]
fn out_of_order_probe_keeps_history_sorted() {
    let mut model = PassiveThermalModel::default();
    let now = fixed_now();
    model.update_tau_at(probe_at(90.0, 0.8, 1), true, now);
    model.update_tau_at(probe_at(95.0, 0.8, 5), true, now);
    model.update_tau_at(probe_at(99.0, 0.8, 0), true, now);

    let stamps: Vec<_> = model.probe_history().iter().map(|p| p.timestamp).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(model.last_probe_time(), Some(now));
}

#[test]
fn passive_results_are_skipped_for_last_active_probe() {
    let mut model = PassiveThermalModel::default();
    let now = fixed_now();
    model.update_tau_at(probe_at(90.0, 0.8, 3), true, now);
    model.update_tau_at(probe_at(120.0, 0.4, 0).as_passive(), false, now);

    assert_eq!(model.last_probe_time(), Some(now));
    assert_eq!(model.last_active_probe_time(), Some(now - Duration::days(3)));
    assert!((model.tau_warming() - 120.0).abs() < 1e-9, "passive results still feed the taus");
}

#[test]
fn extend_history_merges_without_replacing() {
    let mut model = PassiveThermalModel::default();
    let now = fixed_now();
    for d in 0..4 {
        model.update_tau_at(probe_at(90.0 + d as f64, 0.8, d), true, now);
    }
    let restored: Vec<_> = (10..13).map(|d| probe_at(100.0, 0.7, d)).collect();

    let added = model.extend_history(restored.clone());
    assert_eq!(added, 3);
    assert_eq!(model.probe_count(), 7);

    // Restoring the same probes again must not duplicate them.
    assert_eq!(model.extend_history(restored), 0);
    assert_eq!(model.probe_count(), 7);

    let stamps: Vec<_> = model.probe_history().iter().map(|p| p.timestamp).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn reset_tau_keeps_history() {
    let mut model = PassiveThermalModel::default();
    model.update_tau_at(probe_at(50.0, 1.0, 0), true, fixed_now());
    model.reset_tau();
    assert_eq!(model.tau_cooling(), 90.0);
    assert_eq!(model.probe_count(), 1);
}

// ── End-to-end learning curve ────────────────────────────────────────────

#[test]
fn confidence_grows_with_probes_and_history_caps() {
    let mut model = PassiveThermalModel::default();
    let now = fixed_now();
    assert_eq!(model.get_confidence(), 0.0);

    let mut previous = 0.0;
    for i in 0..35 {
        let days_ago = 40 - (i * 40 / 35);
        let conf = 0.8 + (i % 3) as f64 * 0.05;
        model.update_tau_at(probe_at(90.0 + (i % 7) as f64, conf, days_ago), i % 2 == 0, now);
        let c = model.get_confidence();
        assert!(c >= previous, "confidence decreased at probe {i}");
        assert!(c <= 1.0);
        previous = c;
    }
    assert!(model.get_confidence() > 0.7);

    for i in 0..60 {
        model.update_tau_at(probe_at(95.0, 0.9, 0).with_timestamp(now + Duration::minutes(i)), true, now);
    }
    assert_eq!(model.probe_count(), 75);
    assert_eq!(model.get_confidence(), 1.0);
}

// ── Prediction ───────────────────────────────────────────────────────────

#[test]
fn predict_drift_moves_toward_outdoor() {
    let model = PassiveThermalModel::new(90.0, 150.0);

    let after_one_tau = model.predict_drift(22.0, 12.0, 90.0, true);
    assert!((after_one_tau - (12.0 + 10.0 * (-1.0f64).exp())).abs() < 1e-9);

    let much_later = model.predict_drift(22.0, 12.0, 10_000.0, true);
    assert!((much_later - 12.0).abs() < 0.01);

    assert_eq!(model.predict_drift(22.0, 12.0, 0.0, true), 22.0);

    // Warming uses the slower tau, so it drifts less in the same time.
    let warming = model.predict_drift(18.0, 28.0, 60.0, false);
    let cooling_equivalent = model.predict_drift(18.0, 28.0, 60.0, true);
    assert!(warming < cooling_equivalent);
}

// ── Performance contract ─────────────────────────────────────────────────

#[test]
fn weighted_tau_over_full_history_is_fast() {
    let mut model = PassiveThermalModel::default();
    let now = fixed_now();
    for i in 0..75 {
        model.update_tau_at(probe_at(80.0 + i as f64, 0.8, 75 - i), i % 2 == 0, now);
    }

    let start = std::time::Instant::now();
    let runs = 100;
    for _ in 0..runs {
        std::hint::black_box(model.calculate_weighted_tau_at(true, now));
    }
    let per_call = start.elapsed() / runs;
    assert!(per_call < std::time::Duration::from_millis(5), "took {per_call:?}");
}
