//! Benchmarks for maze_engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use maze_engine::{
    Challenge, ConvergenceTracker, OptionParams, RandomSource, SimulationConfig, simulate,
};

const BUDGET: usize = 100_000;

fn benchmark_pi_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("pi_run");
    group.throughput(Throughput::Elements(BUDGET as u64));

    for antithetic in [false, true] {
        let config = SimulationConfig::new(Challenge::Pi, BUDGET, antithetic, Some(42));
        let label = if antithetic { "antithetic" } else { "standard" };

        group.bench_with_input(BenchmarkId::from_parameter(label), &config, |b, cfg| {
            b.iter(|| simulate(black_box(*cfg)))
        });
    }

    group.finish();
}

fn benchmark_option_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("option_run");
    group.throughput(Throughput::Elements(BUDGET as u64));

    let challenge = Challenge::OptionPrice(OptionParams::default());
    for antithetic in [false, true] {
        let config = SimulationConfig::new(challenge, BUDGET, antithetic, Some(42));
        let label = if antithetic { "antithetic" } else { "standard" };

        group.bench_with_input(BenchmarkId::from_parameter(label), &config, |b, cfg| {
            b.iter(|| simulate(black_box(*cfg)))
        });
    }

    group.finish();
}

fn benchmark_batch_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("option_batch_size");

    let challenge = Challenge::OptionPrice(OptionParams::default());
    for batch_size in [100, 1_000, 10_000, 100_000] {
        let config =
            SimulationConfig::new(challenge, BUDGET, false, Some(7)).with_batch_size(batch_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &config,
            |b, cfg| b.iter(|| simulate(black_box(*cfg))),
        );
    }

    group.finish();
}

fn benchmark_tracker_update(c: &mut Criterion) {
    let mut rng = RandomSource::from_seed(1);
    let outcomes = rng.next_normal(10_000).unwrap_or_default();

    c.bench_function("tracker_update_10k", |b| {
        b.iter(|| {
            let mut tracker = ConvergenceTracker::new();
            tracker.update(black_box(&outcomes))
        })
    });
}

fn benchmark_normal_draws(c: &mut Criterion) {
    let mut rng = RandomSource::from_seed(1);
    let mut buffer = vec![0.0; 10_000];

    c.bench_function("fill_normal_10k", |b| {
        b.iter(|| rng.fill_normal(black_box(&mut buffer)))
    });
}

criterion_group!(
    benches,
    benchmark_pi_runs,
    benchmark_option_runs,
    benchmark_batch_size,
    benchmark_tracker_update,
    benchmark_normal_draws,
);
criterion_main!(benches);
