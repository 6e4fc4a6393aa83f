//! Benchmark for loot rolls and spawn assignment.
//!
//! Run with: cargo bench --package geoquest_economy --bench loot_benchmark

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use geoquest_economy::{create_spawn_location, LootTable};
use geoquest_shared::{LatLng, PlayableLocation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn benchmark_chest_roll(c: &mut Criterion) {
    let table = LootTable::chest();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    c.bench_function("chest_roll", |b| {
        b.iter(|| black_box(table.roll(&mut rng)));
    });
}

fn benchmark_thousand_spawns(c: &mut Criterion) {
    let locations: Vec<PlayableLocation> = (0..1_000)
        .map(|i| PlayableLocation {
            name: format!("curated/place_{i}"),
            snapped_point: Some(LatLng::new(37.42, -122.08)),
            center_point: None,
        })
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let mut group = c.benchmark_group("spawn_assignment");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("thousand_locations", |b| {
        b.iter(|| {
            for location in &locations {
                black_box(create_spawn_location(location, &mut rng).ok());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_chest_roll, benchmark_thousand_spawns);
criterion_main!(benches);
