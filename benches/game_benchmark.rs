//! Benchmarks for running complete games.
//!
//! This benchmarks the headless game loop used by tournaments.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use conquest::{GameConfig, RunConfig, Simulation, run_game};

fn bench_single_game(c: &mut Criterion) {
    let config = GameConfig::with_counts(0, 2);
    let run = RunConfig::default();

    c.bench_function("single_game_2p", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), black_box(&config), black_box(&run));
            black_box(result)
        });
    });
}

fn bench_single_game_6p(c: &mut Criterion) {
    let config = GameConfig::with_counts(0, 6);
    let run = RunConfig::default();

    c.bench_function("single_game_6p", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), black_box(&config), black_box(&run));
            black_box(result)
        });
    });
}

fn bench_tick(c: &mut Criterion) {
    let config = GameConfig {
        seed: 7,
        ..GameConfig::with_counts(0, 4)
    };

    c.bench_function("tick_16ms_4p", |b| {
        b.iter_batched(
            || {
                let mut sim = Simulation::new(&config).unwrap();
                sim.tick_ms(30_000);
                sim
            },
            |mut sim| black_box(sim.tick_ms(black_box(16))),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_single_game, bench_single_game_6p, bench_tick);
criterion_main!(benches);
