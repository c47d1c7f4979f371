//! Benchmarks for chatmerge row processing.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench pipeline -- group_rows`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatmerge::core::{RawRow, group_rows, to_json};
use chatmerge::parsing::{Normalizer, clean_chat_text, encode_fragment};
use chatmerge::progress::no_progress;

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_rows(count: usize) -> Vec<RawRow> {
    (0..count)
        .map(|i| {
            let video = format!("video{:06}", i % 50);
            let ts = format!(
                "2024-01-01T{:02}:{:02}:{:02}.123456Z",
                (i / 3600) % 24,
                (i / 60) % 60,
                i % 60
            );
            let text = format!("{},{}", encode_fragment("Message "), encode_fragment(&i.to_string()));
            let price = if i % 20 == 0 { "500" } else { "" };
            RawRow::from_cells(&[video.as_str(), "chat", ts.as_str(), text.as_str(), "UC1", price])
        })
        .collect()
}

// =============================================================================
// Row-level Benchmarks
// =============================================================================

fn bench_normalize_timestamp(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    c.bench_function("normalize_timestamp", |b| {
        b.iter(|| normalizer.normalize(black_box("2024-01-01T12:34:56.789012+00:00")).unwrap());
    });
}

fn bench_clean_chat_text(c: &mut Criterion) {
    let raw = r#"{"text":"Hello "},{"emojiId":"UCkszU/abc"},{"text":"world, "},{"text":"こんにちは"}"#;
    c.bench_function("clean_chat_text", |b| {
        b.iter(|| clean_chat_text(black_box(raw)).unwrap());
    });
}

// =============================================================================
// Grouping Benchmarks
// =============================================================================

fn bench_group_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_rows");
    let normalizer = Normalizer::default();
    let progress = no_progress();

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let rows = generate_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(group_rows(black_box(rows), &normalizer, &progress)));
        });
    }
    group.finish();
}

fn bench_to_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_json");
    let normalizer = Normalizer::default();

    for size in [1_000_usize, 10_000] {
        let videos = group_rows(&generate_rows(size), &normalizer, &no_progress())
            .videos
            .into_videos();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &videos, |b, videos| {
            b.iter(|| to_json(black_box(videos)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_normalize_timestamp,
    bench_clean_chat_text,
    bench_group_rows,
    bench_to_json
);
criterion_main!(benches);
