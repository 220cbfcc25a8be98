use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use tennis_core::engine::{run_batch, EngineConfig, MatchSetup, MatchSimulation};
use tennis_core::predictor::StrengthModel;

fn full_match(c: &mut Criterion) {
    let config = EngineConfig::realistic();
    let predictor = Arc::new(StrengthModel::default());

    c.bench_function("grand_slam_match", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let sim = MatchSimulation::seeded(MatchSetup::demo(), &config, seed, predictor.clone())
                .expect("valid setup");
            black_box(sim.run().expect("match finishes"))
        })
    });
}

fn batch_of_32(c: &mut Criterion) {
    let config = EngineConfig::realistic();
    let setup = MatchSetup::demo();

    c.bench_function("batch_32_matches", |b| {
        b.iter(|| {
            black_box(
                run_batch(&setup, &config, 32, 7, Arc::new(StrengthModel::default()))
                    .expect("batch finishes"),
            )
        })
    });
}

criterion_group!(benches, full_match, batch_of_32);
criterion_main!(benches);
