use chrono::Duration;
use proptest::prelude::*;
use test_fixtures::base_time;
use thermal_core::models::ProbeResult;
use thermal_state::ThermalManager;

proptest! {
    #[test]
    fn serialize_restore_round_trips(
        probes in prop::collection::vec((1.0f64..999.0, 0.01f64..1.0, 60i64..20_000, 0i64..5_000_000), 1..12),
    ) {
        let mut source = ThermalManager::default();
        for (i, (tau, confidence, duration, offset_secs)) in probes.iter().enumerate() {
            let probe = ProbeResult::new(*tau, *confidence, *duration, 0.9, false)
                .with_timestamp(base_time() - Duration::seconds(*offset_secs));
            source.model_mut().update_tau_at(probe, i % 2 == 0, base_time());
        }

        let value = source.serialize().unwrap();
        let mut target = ThermalManager::default();
        target.restore(&value);

        prop_assert_eq!(target.model().tau_cooling(), source.model().tau_cooling());
        prop_assert_eq!(target.model().tau_warming(), source.model().tau_warming());
        prop_assert_eq!(target.corruption_recovery_count(), 0);

        let kept = source.model().probe_count().min(5);
        let original: Vec<_> = source.model().probe_history().iter().rev().take(kept).collect();
        let restored: Vec<_> = target.model().probe_history().iter().rev().collect();
        prop_assert_eq!(restored.len(), kept);
        for (r, o) in restored.iter().zip(original.iter()) {
            prop_assert_eq!(r.timestamp, o.timestamp);
            prop_assert_eq!(r.tau_value, o.tau_value);
        }
    }

    #[test]
    fn restore_never_shrinks_history(
        live in 0usize..20,
        persisted in 0usize..5,
    ) {
        let mut saved = ThermalManager::default();
        for i in 0..persisted {
            let probe = ProbeResult::new(90.0, 0.8, 1800, 0.9, false)
                .with_timestamp(base_time() - Duration::days(i as i64 + 1));
            saved.model_mut().update_tau_at(probe, true, base_time());
        }
        let value = saved.serialize().unwrap();

        let mut m = ThermalManager::default();
        for i in 0..live {
            let probe = ProbeResult::new(100.0, 0.6, 1800, 0.9, false)
                .with_timestamp(base_time() + Duration::hours(i as i64 + 1));
            m.model_mut().update_tau_at(probe, false, base_time());
        }
        m.restore(&value);
        prop_assert!(m.model().probe_count() >= live);
        prop_assert!(m.model().probe_count() >= persisted);
        prop_assert_eq!(m.model().probe_count(), live + persisted);
    }
}
