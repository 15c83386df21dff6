//! Benchmarks for map generation.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use conquest::mapgen::{delaunay_edges, generate_map};
use conquest::{MapConfig, Point, SamplerKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bench_generate_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_map");
    for sampler in [SamplerKind::PoissonDisc, SamplerKind::JitteredGrid] {
        let config = MapConfig {
            sampler,
            ..MapConfig::default()
        };
        for players in [2usize, 10] {
            group.bench_with_input(
                BenchmarkId::new(format!("{sampler:?}"), players),
                &players,
                |b, &players| {
                    b.iter(|| {
                        let mut rng = ChaCha8Rng::seed_from_u64(black_box(42));
                        black_box(generate_map(&config, players, &mut rng))
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_delaunay(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let points: Vec<Point> = (0..200)
        .map(|_| Point::new(rng.random_range(0.0..1920.0), rng.random_range(0.0..1080.0)))
        .collect();

    c.bench_function("delaunay_200", |b| {
        b.iter(|| black_box(delaunay_edges(black_box(&points))));
    });
}

criterion_group!(benches, bench_generate_map, bench_delaunay);
criterion_main!(benches);
