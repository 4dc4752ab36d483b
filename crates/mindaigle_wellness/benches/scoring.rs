use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use mindaigle_store_client::DailyMetrics;
use mindaigle_store_client::memory::InMemoryHealthStore;
use mindaigle_wellness::WellnessService;
use mindaigle_wellness::domains::scoring::{
    adjusted_wellness_score, daily_percentage_score, wellness_score,
};
use mindaigle_wellness::types::{NumberLike, RawMetricSample};
use tokio::runtime::Builder;

fn complete_day() -> DailyMetrics {
    DailyMetrics {
        steps: Some(8000.0),
        heart_rate: Some(70.0),
        temperature: Some(36.6),
        sleep_duration: Some(6.0),
        exercise_duration: Some(30.0),
        age: Some(30.0),
        mood: Some(4.0),
        stress: Some(3.0),
        hydration: Some(5.0),
        nutrition: Some(4.0),
    }
}

fn bench_scoring(c: &mut Criterion) {
    let full = complete_day();
    let partial = DailyMetrics {
        sleep_duration: Some(8.0),
        heart_rate: Some(50.0),
        ..Default::default()
    };

    c.bench_function("wellness_score_full", |b| {
        b.iter(|| wellness_score(black_box(&full)))
    });
    c.bench_function("adjusted_wellness_score_partial", |b| {
        b.iter(|| adjusted_wellness_score(black_box(&partial)))
    });
    c.bench_function("daily_percentage_score", |b| {
        b.iter(|| daily_percentage_score(black_box(&full)))
    });
}

fn bench_submission(c: &mut Criterion) {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let service = WellnessService::new(Arc::new(InMemoryHealthStore::new()));
    let raw = RawMetricSample {
        uid: Some("bench".into()),
        date: Some("2025-03-01".into()),
        steps: Some(NumberLike::Num(6500.0)),
        heart_rate: Some(NumberLike::Str("64".into())),
        mood: Some(NumberLike::Num(4.0)),
        ..Default::default()
    };

    c.bench_function("submit_daily_data_in_memory", |b| {
        b.iter(|| {
            rt.block_on(service.submit_daily_data(black_box(&raw)))
                .expect("submit")
        })
    });
}

criterion_group!(benches, bench_scoring, bench_submission);
criterion_main!(benches);
