//! Criterion benchmarks for the per-day hot loops.
//!
//! Run with: `cargo bench -p growthlab-runner`

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use growthlab_core::domain::{DividendEvent, DividendSchedule, PriceSeries};
use growthlab_runner::comparator::add_cumulative_dividends;
use growthlab_runner::metrics::normalize_to_investment;
use growthlab_runner::simulator::simulate_reinvestment;

/// Daily series with a gentle drift and a dividend every 63 days.
fn generate_inputs(days: usize) -> (PriceSeries, Vec<DividendEvent>) {
    let start = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    let mut pairs = Vec::with_capacity(days);
    let mut dividends = Vec::new();
    for i in 0..days {
        let date = start.checked_add_days(Days::new(i as u64)).unwrap();
        pairs.push((date, 100.0 + (i % 50) as f64 * 0.3 + i as f64 * 0.01));
        if i % 63 == 62 {
            dividends.push(DividendEvent::new(date, 0.5));
        }
    }
    (PriceSeries::from_pairs(pairs).unwrap(), dividends)
}

fn bench_reinvestment(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_reinvestment");
    for size in [252, 2520, 10080].iter() {
        let (series, dividends) = generate_inputs(*size);
        let schedule = DividendSchedule::from_events(&dividends);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let _ = simulate_reinvestment(black_box(&series), black_box(&schedule), 1000.0);
            });
        });
    }
    group.finish();
}

fn bench_comparator_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparator");
    for size in [252, 2520, 10080].iter() {
        let (series, dividends) = generate_inputs(*size);
        group.bench_with_input(BenchmarkId::new("normalize", size), size, |b, _| {
            b.iter(|| {
                let _ = normalize_to_investment(black_box(&series), 1000.0);
            });
        });
        group.bench_with_input(BenchmarkId::new("cumulative_dividends", size), size, |b, _| {
            b.iter(|| {
                let _ = add_cumulative_dividends(black_box(&series), black_box(&dividends));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reinvestment, bench_comparator_transforms);
criterion_main!(benches);
