//! # Scoring Benchmarks
//!
//! | Stage | Work | Target |
//! |-------|------|--------|
//! | assemble | window sums per validator | < 10ms for 1000 validators |
//! | score + select | formula and O(V log V) sort | < 5ms for 1000 validators |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nc_02_validator_scoring::{
    assemble_records, evaluate_snapshot, ScoreEngine, ScoringPolicy, SelectionPolicy, Selector,
};
use nc_tests::fixtures::large_snapshot;

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("nc-02-assembly");

    for validators in [100, 300, 1000] {
        let snapshot = large_snapshot(validators, 28);
        group.throughput(Throughput::Elements(validators as u64));
        group.bench_with_input(
            BenchmarkId::new("assemble_records", validators),
            &snapshot,
            |b, snapshot| b.iter(|| black_box(assemble_records(snapshot).unwrap())),
        );
    }

    group.finish();
}

fn bench_score_and_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("nc-02-score-select");
    let engine = ScoreEngine::new(ScoringPolicy::for_testing());
    let selector = Selector::new(SelectionPolicy::default()).unwrap();

    for validators in [100, 300, 1000] {
        let records = assemble_records(&large_snapshot(validators, 28)).unwrap();
        group.throughput(Throughput::Elements(validators as u64));
        group.bench_with_input(
            BenchmarkId::new("score_all_select", validators),
            &records,
            |b, records| {
                b.iter(|| {
                    let mut records = records.clone();
                    engine.score_all(&mut records);
                    black_box(selector.select(&records))
                })
            },
        );
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let snapshot = large_snapshot(1000, 28);
    c.bench_function("nc-02-evaluate-snapshot-1000", |b| {
        b.iter(|| {
            black_box(
                evaluate_snapshot(
                    &snapshot,
                    ScoringPolicy::for_testing(),
                    SelectionPolicy::default(),
                )
                .unwrap(),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_assembly,
    bench_score_and_select,
    bench_full_pipeline
);
criterion_main!(benches);
