use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use thermal_core::models::ProbeResult;
use thermal_model::PassiveThermalModel;

/// Full history: 75 probes spread over 75 days, alternating direction.
fn full_model() -> PassiveThermalModel {
    let now = Utc::now();
    let mut model = PassiveThermalModel::default();
    for i in 0..75 {
        let probe = ProbeResult::new(80.0 + i as f64, 0.8, 3600, 0.9, false)
            .with_timestamp(now - Duration::days(75 - i))
            .with_outdoor_temp(Some(i as f64 % 30.0));
        model.update_tau_at(probe, i % 2 == 0, now);
    }
    model
}

fn bench_weighted_tau(c: &mut Criterion) {
    let model = full_model();
    let now = Utc::now();

    c.bench_function("weighted_tau_75_probes", |b| {
        b.iter(|| black_box(model.calculate_weighted_tau_at(black_box(true), now)));
    });
}

fn bench_update_tau(c: &mut Criterion) {
    let now = Utc::now();
    c.bench_function("update_tau_at_capacity", |b| {
        let mut model = full_model();
        b.iter(|| {
            let probe = ProbeResult::new(95.0, 0.9, 3600, 0.9, false).with_timestamp(now);
            model.update_tau_at(probe, false, now);
        });
    });
}

criterion_group!(benches, bench_weighted_tau, bench_update_tau);
criterion_main!(benches);
