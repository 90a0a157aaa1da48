use cadence_core::models::{GenerationBounds, Occurrence};
use cadence_core::{decode_rule, encode_rule, generate_occurrences, normalize_value};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn anchor() -> Occurrence {
    Occurrence::At(
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    )
}

fn bench_codec(c: &mut Criterion) {
    let text = "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE,FR;UNTIL=2025-12-31";
    let rule = decode_rule(text).unwrap();

    c.bench_function("decode_rule", |b| b.iter(|| decode_rule(black_box(text))));
    c.bench_function("encode_rule", |b| b.iter(|| encode_rule(black_box(&rule))));
}

fn bench_normalize(c: &mut Criterion) {
    let metadata = json!({
        "frequency": "weekly",
        "interval": "2",
        "weekdays": ["monday", "WE", 5, "XX"],
        "count": 10
    });

    c.bench_function("normalize_metadata", |b| {
        b.iter(|| normalize_value(black_box(&metadata)))
    });
}

fn bench_occurrence_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("occurrence_generation");

    for text in [
        "FREQ=DAILY;INTERVAL=1",
        "FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE",
        "FREQ=MONTHLY;INTERVAL=1",
    ] {
        let rule = decode_rule(text).unwrap();
        for horizon in [30u32, 365, 3660] {
            let bounds = GenerationBounds::new(10_000, horizon);
            group.bench_with_input(BenchmarkId::new(text, horizon), &horizon, |b, _| {
                b.iter(|| generate_occurrences(black_box(anchor()), black_box(&rule), black_box(&bounds)))
            });
        }
    }
    group.finish();
}

/// A rule with few matches across the whole horizon.
fn bench_sparse_weekly(c: &mut Criterion) {
    let rule = decode_rule("FREQ=WEEKLY;INTERVAL=26;BYDAY=SU").unwrap();
    let bounds = GenerationBounds::new(10_000, 3660);
    let start = Occurrence::AllDay(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());

    c.bench_function("sparse_weekly_preview", |b| {
        b.iter(|| generate_occurrences(black_box(start), black_box(&rule), black_box(&bounds)))
    });
}

criterion_group!(
    benches,
    bench_codec,
    bench_normalize,
    bench_occurrence_generation,
    bench_sparse_weekly
);
criterion_main!(benches);
