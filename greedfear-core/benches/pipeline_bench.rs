//! Criterion benchmarks for the sentiment hot path.
//!
//! Benchmarks:
//! 1. Indicator frame (every indicator over the full history)
//! 2. Full pipeline (indicators, scoring, aggregation)
//! 3. Series merge of a recomputed history into a stored one

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use greedfear_core::data::synthetic::generate_bars;
use greedfear_core::domain::Bar;
use greedfear_core::indicators::{IndicatorFrame, IndicatorParams};
use greedfear_core::store::Series;
use greedfear_core::{compute_sentiment, SentimentConfig};

fn make_bars(years: i32) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2010, 6, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2010 + years, 5, 31).unwrap();
    generate_bars("399006.SZ", start, end)
}

fn bench_indicator_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_frame");
    let params = IndicatorParams::default();
    for years in [1, 5, 15] {
        let bars = make_bars(years);
        group.bench_with_input(BenchmarkId::from_parameter(bars.len()), &bars, |b, bars| {
            b.iter(|| IndicatorFrame::compute(black_box(bars), &params))
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_sentiment");
    let config = SentimentConfig::default();
    for years in [1, 5, 15] {
        let bars = make_bars(years);
        group.bench_with_input(BenchmarkId::from_parameter(bars.len()), &bars, |b, bars| {
            b.iter(|| compute_sentiment(black_box(bars), &config))
        });
    }
    group.finish();
}

fn bench_series_merge(c: &mut Criterion) {
    let records = compute_sentiment(&make_bars(15), &SentimentConfig::default()).records;
    let stored = Series::from_records(records[..records.len() - 5].to_vec());

    c.bench_function("series_merge_15y", |b| {
        b.iter(|| {
            let mut series = stored.clone();
            black_box(series.merge(records.clone()))
        })
    });
}

criterion_group!(
    benches,
    bench_indicator_frame,
    bench_pipeline,
    bench_series_merge
);
criterion_main!(benches);
