//! Benchmarks for spark-cocomp
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spark_cocomp::{model, CoComp, Comparator, Model, ObservableVec, RegistrationOptions};
use std::rc::Rc;

type Engine = CoComp<ObservableVec<Model>>;

fn filled(size: usize, offset: usize) -> Rc<ObservableVec<Model>> {
    Rc::new(ObservableVec::from_members(
        (0..size).map(|i| model! { "id" => (i + offset) }),
    ))
}

fn engine_with(comparator: Comparator<Model>, sizes: &[usize]) -> Engine {
    let engine = Engine::with_comparator(comparator).unwrap();
    for (i, size) in sizes.iter().enumerate() {
        engine
            .set(&format!("c{i}"), filled(*size, i * size / 2), RegistrationOptions::silent())
            .unwrap();
    }
    engine
}

// =============================================================================
// BULK BENCHMARKS
// =============================================================================

fn bench_compare_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_all");
    for size in [10usize, 50, 100] {
        let engine = engine_with(Comparator::default(), &[size, size, size]);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(engine.compare_all()))
        });
    }
    group.finish();
}

fn bench_compare_identity(c: &mut Criterion) {
    let engine = engine_with(Comparator::Identity, &[100, 100]);
    c.bench_function("compare_identity_100x100", |b| {
        b.iter(|| black_box(engine.compare_all()))
    });
}

// =============================================================================
// INCREMENTAL BENCHMARKS
// =============================================================================

fn bench_add_remove(c: &mut Criterion) {
    let engine = engine_with(Comparator::default(), &[0, 100, 100]);
    let target = engine.get("c0").unwrap();
    c.bench_function("add_remove_against_2x100", |b| {
        b.iter(|| {
            let item = model! { "id" => 42 };
            target.add(item.clone());
            target.remove(black_box(&item));
        })
    });
}

fn bench_reset(c: &mut Criterion) {
    let engine = engine_with(Comparator::default(), &[50, 50]);
    let target = engine.get("c0").unwrap();
    c.bench_function("reset_50_against_50", |b| {
        b.iter(|| target.reset((0..50).map(|i| model! { "id" => i })))
    });
}

criterion_group!(bulk_benches, bench_compare_all, bench_compare_identity);
criterion_group!(incremental_benches, bench_add_remove, bench_reset);

criterion_main!(bulk_benches, incremental_benches);
