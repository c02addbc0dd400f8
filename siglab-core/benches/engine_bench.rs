//! Criterion benchmarks for the hot paths: signal generation, simulation,
//! and metrics over a multi-year hourly series.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use siglab_core::backtest::{run_backtest, BacktestParams};
use siglab_core::data::{add_basic_features, synthetic_candles, FeatureFrame, FeatureParams};
use siglab_core::metrics::PerformanceMetrics;
use siglab_core::signals::{SignalGenerator, SmaCrossover};

fn feature_frame(n: usize) -> FeatureFrame {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let candles = synthetic_candles(n, start, Duration::hours(1), 0.0002, 0.01, 42);
    add_basic_features(&candles, &FeatureParams::default()).unwrap()
}

fn bench_signal_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_generation");
    for n in [8_760, 26_280] {
        let frame = feature_frame(n);
        let producer = SmaCrossover::new(20, 100).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &frame, |b, frame| {
            b.iter(|| producer.generate(black_box(frame)).unwrap());
        });
    }
    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    for n in [8_760, 26_280] {
        let frame = feature_frame(n);
        let signaled = SmaCrossover::new(20, 100).unwrap().generate(&frame).unwrap();
        let params = BacktestParams::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &signaled, |b, frame| {
            b.iter(|| run_backtest(black_box(frame), &params).unwrap());
        });
    }
    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let frame = feature_frame(26_280);
    let signaled = SmaCrossover::new(20, 100).unwrap().generate(&frame).unwrap();
    let result = run_backtest(&signaled, &BacktestParams::default()).unwrap();

    c.bench_function("metrics_26280", |b| {
        b.iter(|| PerformanceMetrics::compute(black_box(&result), 8760.0));
    });
}

criterion_group!(
    benches,
    bench_signal_generation,
    bench_simulation,
    bench_metrics
);
criterion_main!(benches);
