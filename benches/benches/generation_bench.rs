//! # Generation Benchmarks
//!
//! Measures wire-set generation: fresh layouts (shuffle + pool draws) versus
//! replaying a cached layout, and full panel registration.
//!
//! Run: `cargo bench --bench generation_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wires_core::{EntityId, TemplateStore, Wire, WireTemplate, WiresConfig};
use wires_system::{
    ActionContext, BehaviorRegistry, LayoutCache, PanelConfig, WireAction, WireDefinition,
    WireSetGenerator, WiresSystem,
};

#[derive(Debug, Default)]
struct Inert;

impl WireAction for Inert {
    fn cut(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
        true
    }
    fn mend(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) -> bool {
        true
    }
    fn pulse(&mut self, _: &mut ActionContext<'_>, _: EntityId, _: &Wire) {}
}

fn registry() -> BehaviorRegistry {
    let mut registry = BehaviorRegistry::new();
    for name in ["a", "b", "c", "d"] {
        registry.register_default::<Inert>(name).unwrap();
    }
    registry
}

fn definition(layout_id: Option<&str>, wires: usize) -> WireDefinition {
    let behaviors = ["a", "b", "c", "d"]
        .iter()
        .cycle()
        .take(wires)
        .map(|s| s.to_string())
        .collect();
    WireDefinition::ad_hoc(layout_id.map(str::to_string), behaviors, 2)
}

/// Benchmark fresh layout vs cached replay
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let registry = registry();

    for wires in [4usize, 12, 24] {
        let fresh = definition(None, wires);
        group.bench_with_input(BenchmarkId::new("fresh", wires), &fresh, |b, def| {
            let mut cache = LayoutCache::new();
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| {
                let generated = WireSetGenerator::new(&registry, &mut cache)
                    .generate(EntityId(1), def, &mut rng)
                    .unwrap();
                black_box(generated.wires.len())
            })
        });

        let cached = definition(Some("Bench"), wires);
        group.bench_with_input(BenchmarkId::new("cached", wires), &cached, |b, def| {
            let mut cache = LayoutCache::new();
            let mut rng = StdRng::seed_from_u64(1);
            WireSetGenerator::new(&registry, &mut cache)
                .generate(EntityId(1), def, &mut rng)
                .unwrap();
            b.iter(|| {
                let generated = WireSetGenerator::new(&registry, &mut cache)
                    .generate(EntityId(2), def, &mut rng)
                    .unwrap();
                black_box(generated.wires.len())
            })
        });
    }

    group.finish();
}

/// Benchmark panel registration (generation + first snapshot)
fn bench_add_panel(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_panel");

    group.bench_function("airlock", |b| {
        let mut templates = TemplateStore::new();
        templates
            .insert(WireTemplate::new("Airlock", ["a", "a", "b", "c", "d"], 3))
            .unwrap();
        let mut system = WiresSystem::new(WiresConfig::seeded(7), templates, registry()).unwrap();
        let mut next = 0u64;

        b.iter(|| {
            next += 1;
            system
                .add_panel(EntityId(next), PanelConfig::with_layout("Airlock"))
                .unwrap();
            black_box(system.remove_panel(EntityId(next)).is_some())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_add_panel);
criterion_main!(benches);
