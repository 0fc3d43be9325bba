use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use thermal_core::models::ProbeResult;
use thermal_model::PassiveThermalModel;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
}

proptest! {
    #[test]
    fn decay_weight_never_increases_with_age(
        confidence in 0.0f64..=1.0,
        a1 in 0i64..2000,
        extra in 0i64..2000,
    ) {
        let model = PassiveThermalModel::default();
        let younger = ProbeResult::new(90.0, confidence, 3600, 0.9, false)
            .with_timestamp(now() - Duration::hours(a1));
        let older = younger.clone().with_timestamp(now() - Duration::hours(a1 + extra));
        prop_assert!(model.decay_weight(&younger, now()) >= model.decay_weight(&older, now()));
    }

    #[test]
    fn weighted_tau_stays_within_probe_range(
        taus in prop::collection::vec(10.0f64..500.0, 1..75),
        confidence in 0.1f64..=1.0,
    ) {
        let mut model = PassiveThermalModel::default();
        for (i, tau) in taus.iter().enumerate() {
            let probe = ProbeResult::new(*tau, confidence, 3600, 0.9, false)
                .with_timestamp(now() - Duration::hours(i as i64));
            model.update_tau_at(probe, true, now());
        }
        let lo = taus.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = taus.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(model.tau_cooling() >= lo - 1e-9);
        prop_assert!(model.tau_cooling() <= hi + 1e-9);
    }

    #[test]
    fn confidence_is_monotonic_and_bounded(count in 1usize..120) {
        let mut model = PassiveThermalModel::default();
        let mut previous = 0.0;
        for i in 0..count {
            let probe = ProbeResult::new(90.0, 0.5, 3600, 0.9, false)
                .with_timestamp(now() + Duration::minutes(i as i64));
            model.update_tau_at(probe, false, now());
            let c = model.get_confidence();
            prop_assert!(c >= previous);
            prop_assert!(c <= 1.0);
            previous = c;
        }
        prop_assert!(model.probe_count() <= 75);
    }
}
