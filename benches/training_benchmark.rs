//! Benchmark for startup preparation and single-deal scoring
//!
//! Run with: cargo bench --bench training_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use clinch::pipeline::{clean_deals, fit_model, TrainingConfig};

const STATUSES: [&str; 3] = ["Completed", "Terminated", "Pending"];
const DEAL_TYPES: [&str; 4] = ["Acquisition", "Merger", "Tender Offer", "Spin-off"];
const NATURES: [&str; 2] = ["Friendly", "Hostile"];
const PAYMENTS: [&str; 3] = ["Cash", "Mixed", "Stock"];

/// Generate a synthetic deal history where hostile, low-premium deals
/// terminate more often
fn generate_deal_history(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut status = Vec::with_capacity(n_rows);
    let mut size = Vec::with_capacity(n_rows);
    let mut premium = Vec::with_capacity(n_rows);
    let mut length = Vec::with_capacity(n_rows);
    let mut deal_type = Vec::with_capacity(n_rows);
    let mut nature = Vec::with_capacity(n_rows);
    let mut payment = Vec::with_capacity(n_rows);

    for _ in 0..n_rows {
        let hostile = rng.gen_bool(0.2);
        let p: f64 = rng.gen::<f64>() * 0.8;
        let close_odds = (if hostile { 0.4 } else { 0.8 }) + p * 0.2;

        status.push(if rng.gen_bool(0.05) {
            STATUSES[2]
        } else if rng.gen_bool(close_odds.min(1.0)) {
            STATUSES[0]
        } else {
            STATUSES[1]
        });
        size.push(if rng.gen_bool(0.02) {
            None
        } else {
            Some(rng.gen::<f64>() * 20_000.0)
        });
        premium.push(Some(p));
        length.push(Some(30.0 + rng.gen::<f64>() * 400.0));
        deal_type.push(DEAL_TYPES[rng.gen_range(0..DEAL_TYPES.len())]);
        nature.push(NATURES[usize::from(hostile)]);
        payment.push(PAYMENTS[rng.gen_range(0..PAYMENTS.len())]);
    }

    df! {
        "Deal Status" => status,
        "Size" => size,
        "Deal Premium" => premium,
        "Deal Lenght" => length,
        "Deal Type" => deal_type,
        "Nature Of Bid" => nature,
        "Payment Type" => payment,
    }
    .expect("Failed to create DataFrame")
}

/// Benchmark cleaning plus fitting for varying history sizes
fn benchmark_preparation_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("preparation_by_rows");
    group.sample_size(20);

    let row_counts = [1_000, 10_000, 50_000];
    let config = TrainingConfig::default();

    for n_rows in row_counts {
        let df = generate_deal_history(n_rows, 42);

        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("clean", n_rows), &df, |b, df| {
            b.iter(|| {
                let _ = clean_deals(black_box(df));
            });
        });

        let cleaned = clean_deals(&df).expect("Failed to clean deals");
        group.bench_with_input(BenchmarkId::new("fit", n_rows), &cleaned, |b, cleaned| {
            b.iter(|| {
                let _ = fit_model(black_box(cleaned), black_box(&config));
            });
        });
    }

    group.finish();
}

/// Benchmark one form submission against a fitted pipeline
fn benchmark_single_prediction(c: &mut Criterion) {
    let df = generate_deal_history(10_000, 42);
    let cleaned = clean_deals(&df).expect("Failed to clean deals");
    let fitted = fit_model(&cleaned, &TrainingConfig::default()).expect("Failed to fit");
    let terms = cleaned.options.default_terms();

    c.bench_function("predict_single_deal", |b| {
        b.iter(|| {
            let _ = fitted.pipeline.predict(black_box(&terms));
        });
    });
}

criterion_group!(
    benches,
    benchmark_preparation_by_rows,
    benchmark_single_prediction
);
criterion_main!(benches);
