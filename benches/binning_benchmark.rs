//! Benchmarks for quantile binning and the lift / IV report builders
//!
//! Run with: cargo bench --bench binning_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use simply_eda::pipeline::{build_iv, build_lift, quantile_bins, AnalysisConfig, DEFAULT_IV_BINS};

/// Generate synthetic data with a continuous target and mixed feature shapes
fn generate_test_dataframe(n_rows: usize, n_features: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let target: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>() * 100.0).collect();
    let mut columns: Vec<Column> = vec![Column::new("y".into(), target.clone())];

    for i in 0..n_features {
        let values: Vec<f64> = match i % 3 {
            0 => (0..n_rows).map(|_| rng.gen::<f64>() * 100.0).collect(),
            1 => {
                // Right-skewed
                (0..n_rows)
                    .map(|_| {
                        let v = rng.gen::<f64>();
                        (v * v * v) * 100.0
                    })
                    .collect()
            }
            _ => {
                // Tracks the target with noise, heavily rounded so ties are common
                target
                    .iter()
                    .map(|t| (t + rng.gen::<f64>() * 20.0 - 10.0).round())
                    .collect()
            }
        };
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).expect("Failed to create DataFrame")
}

/// Binning a single column of increasing length
fn benchmark_quantile_bins(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantile_bins");
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);

    for n_rows in [10_000, 100_000, 1_000_000] {
        let values: Vec<Option<f64>> = (0..n_rows)
            .map(|_| {
                if rng.gen_bool(0.02) {
                    None
                } else {
                    Some(rng.gen::<f64>())
                }
            })
            .collect();
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("deciles", n_rows), &values, |b, values| {
            b.iter(|| quantile_bins(black_box(values), black_box(10)));
        });
    }

    group.finish();
}

/// Full lift and IV runs over datasets of increasing width
fn benchmark_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("engines");
    group.sample_size(20);

    let lift_config = AnalysisConfig::default();
    let iv_config = AnalysisConfig::default().with_bin_count(DEFAULT_IV_BINS);

    for (n_rows, n_features) in [(1_000, 10), (10_000, 20), (50_000, 50)] {
        let df = generate_test_dataframe(n_rows, n_features, 42);
        let label = format!("{}x{}", n_rows, n_features);
        group.throughput(Throughput::Elements(n_features as u64));

        group.bench_with_input(BenchmarkId::new("lift", &label), &df, |b, df| {
            b.iter(|| build_lift(black_box(df), black_box("y"), black_box(&lift_config)));
        });

        group.bench_with_input(BenchmarkId::new("iv", &label), &df, |b, df| {
            b.iter(|| build_iv(black_box(df), black_box("y"), black_box(&iv_config)));
        });
    }

    group.finish();
}

/// Effect of the requested bin count on a fixed dataset
fn benchmark_bin_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("bin_count_impact");
    let df = generate_test_dataframe(10_000, 10, 42);

    for bins in [4, 10, 20, 50] {
        let config = AnalysisConfig::default().with_bin_count(bins);
        group.bench_with_input(BenchmarkId::new("lift", bins), &config, |b, config| {
            b.iter(|| build_lift(black_box(&df), black_box("y"), black_box(config)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_quantile_bins,
    benchmark_engines,
    benchmark_bin_counts
);
criterion_main!(benches);
