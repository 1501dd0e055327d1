//! # Timed Action Benchmarks
//!
//! Measures the timed action registry: tick cost with many pending actions
//! and the start/cancel path.
//!
//! Run: `cargo bench --bench timed_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wires_core::{EntityId, StateKey};
use wires_system::TimedActionRegistry;

/// Benchmark tick over N pending actions that never complete
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("timed_tick");

    for owners in [10u64, 100, 1000] {
        let mut registry = TimedActionRegistry::new();
        for owner in 0..owners {
            registry.start(EntityId(owner), f32::MAX, StateKey::from("bolt"), ());
            registry.start(EntityId(owner), f32::MAX, StateKey::from("timer"), ());
        }

        group.bench_with_input(BenchmarkId::from_parameter(owners), &owners, |b, _| {
            b.iter(|| black_box(registry.tick(0.016).len()))
        });
    }

    group.finish();
}

/// Benchmark start + cancel + drain cycle
fn bench_start_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("timed_start_cancel");
    let key = StateKey::from_static("pulse");

    group.bench_function("cycle", |b| {
        let mut registry = TimedActionRegistry::new();
        b.iter(|| {
            registry.start(EntityId(1), 5.0, key.clone(), 0u32);
            registry.cancel(EntityId(1), &key);
            black_box(registry.tick(0.0))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_start_cancel);
criterion_main!(benches);
