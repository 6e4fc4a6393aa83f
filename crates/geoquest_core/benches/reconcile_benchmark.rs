//! # Reconcile Benchmark
//!
//! A world data refresh must reconcile well inside one frame.
//!
//! Run with: `cargo bench --package geoquest_core --bench reconcile_benchmark`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geoquest_core::{Haversine, SpawnEntity, SpawnRegistry, SpawnRenderer};
use geoquest_shared::{LatLng, SpawnKind};

/// Renderer that only counts.
#[derive(Default)]
struct NullRenderer {
    next: u64,
}

impl SpawnRenderer for NullRenderer {
    type Handle = u64;

    fn instantiate(&mut self, _entity: &SpawnEntity, _position: LatLng, _visible: bool) -> u64 {
        self.next += 1;
        self.next
    }

    fn destroy(&mut self, _id: &str, _handle: u64) {}

    fn set_visible(&mut self, _handle: &mut u64, _visible: bool) {}
}

fn make_entities(count: usize, offset: usize) -> Vec<SpawnEntity> {
    (0..count)
        .map(|i| {
            let n = (i + offset) as f64;
            SpawnEntity::new(
                format!("loc_{}", i + offset),
                SpawnKind::ALL[i % SpawnKind::ALL.len()],
                Some(LatLng::new(37.42 + n * 1e-5, -122.08 + n * 1e-5)),
            )
        })
        .collect()
}

/// Steady state: same set, avatar walking.
fn bench_toggle_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_toggle");

    for count in [100, 1_000, 10_000] {
        let entities = make_entities(count, 0);
        let mut registry = SpawnRegistry::new();
        let mut renderer = NullRenderer::default();
        registry.reconcile(&entities, LatLng::new(37.42, -122.08), 500.0, &Haversine, &mut renderer);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut step = 0.0;
            b.iter(|| {
                step += 1e-6;
                black_box(registry.reconcile(
                    black_box(&entities),
                    LatLng::new(37.42 + step, -122.08),
                    500.0,
                    &Haversine,
                    &mut renderer,
                ))
            });
        });
    }

    group.finish();
}

/// Churn: half the set replaced each pass.
fn bench_churn_pass(c: &mut Criterion) {
    let count = 1_000;
    let a = make_entities(count, 0);
    let b_set = make_entities(count, count / 2);

    c.bench_function("reconcile_churn_1000", |b| {
        let mut registry = SpawnRegistry::new();
        let mut renderer = NullRenderer::default();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let incoming = if flip { &a } else { &b_set };
            black_box(registry.reconcile(
                incoming,
                LatLng::new(37.42, -122.08),
                500.0,
                &Haversine,
                &mut renderer,
            ))
        });
    });
}

criterion_group!(benches, bench_toggle_pass, bench_churn_pass);
criterion_main!(benches);
