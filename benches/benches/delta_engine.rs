//! Benchmarks for the delta engine
//!
//! Performance-critical paths:
//! - `build_deltas`: line diff plus word parts for every modified region
//! - `process_text_event`: reconciling a keystroke with all deltas
//! - `accept_delta`: merge accepts forwarded to the sibling diff

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use delta_engine::{
    ConflictSide, EngineConfig, FileDiff, FileDiffHeader, MergeData, MyersDiff, build_deltas,
    line_edits,
};

/// Source-like text with `lines` lines. Every `stride`-th line differs when
/// `variant` is set.
fn generate_text(lines: usize, stride: usize, variant: bool) -> String {
    (0..lines)
        .map(|i| {
            if variant && i % stride == 0 {
                format!("    let value_{i} = compute({i}, \"changed\");\n")
            } else {
                format!("    let value_{i} = compute({i}, \"original\");\n")
            }
        })
        .collect()
}

fn bench_build_deltas(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta_engine/build_deltas");
    let config = EngineConfig::default();

    for lines in [100usize, 1_000, 10_000] {
        let old = generate_text(lines, 10, false);
        let new = generate_text(lines, 10, true);
        let edits = line_edits(&MyersDiff::new(), &old, &new);

        group.throughput(Throughput::Bytes(new.len() as u64));
        group.bench_with_input(BenchmarkId::new("lines", lines), &lines, |b, _| {
            b.iter(|| build_deltas(black_box(&old), black_box(&new), black_box(&edits), &config));
        });
    }

    group.finish();
}

fn bench_line_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta_engine/line_diff");

    for stride in [2usize, 10, 100] {
        let old = generate_text(2_000, stride, false);
        let new = generate_text(2_000, stride, true);
        group.bench_with_input(BenchmarkId::new("stride", stride), &stride, |b, _| {
            b.iter(|| line_edits(&MyersDiff::new(), black_box(&old), black_box(&new)));
        });
    }

    group.finish();
}

fn bench_process_text_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta_engine/process_text_event");

    for lines in [100usize, 1_000, 10_000] {
        let diff = FileDiff::from_texts(
            FileDiffHeader::modified("bench.rs"),
            generate_text(lines, 10, false),
            generate_text(lines, 10, true),
            &MyersDiff::new(),
        )
        .unwrap();
        let middle = diff.change_deltas()[diff.change_deltas().len() / 2].start_index(
            delta_engine::ChangeSide::New,
        );

        group.bench_with_input(BenchmarkId::new("keystroke", lines), &lines, |b, _| {
            b.iter_batched(
                || diff.clone(),
                |mut diff| diff.process_text_event(black_box(middle), 0, Some("x")),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_merge_accept(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta_engine/merge_accept");

    for lines in [100usize, 1_000] {
        let base = generate_text(lines, 10, false);
        let yours = generate_text(lines, 10, true);
        let theirs = generate_text(lines, 15, true).replace("changed", "other");
        let merge = MergeData::from_texts(
            (
                FileDiffHeader::modified("bench.rs"),
                FileDiffHeader::modified("bench.rs"),
            ),
            &base,
            &yours,
            &theirs,
            &MyersDiff::new(),
            &EngineConfig::default(),
        )
        .unwrap();
        let last = merge.diff(ConflictSide::Yours).change_deltas().len() - 2;

        group.bench_with_input(BenchmarkId::new("last_change", lines), &lines, |b, _| {
            b.iter_batched(
                || merge.clone(),
                |mut merge| merge.accept_delta(black_box(last), ConflictSide::Yours),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_deltas,
    bench_line_diff,
    bench_process_text_event,
    bench_merge_accept
);
criterion_main!(benches);
