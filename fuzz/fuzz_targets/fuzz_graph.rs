#![no_main]

//! Graph repair fuzzer.
//!
//! Triangulates arbitrary point sets, prunes by angle and repairs. The
//! result must always be a connected, symmetric graph without self-loops.

use arbitrary::Arbitrary;
use conquest::mapgen::{delaunay_edges, ensure_connectivity, ensure_minimum_degree, prune_by_angle};
use conquest::{Point, TerritoryStore};
use libfuzzer_sys::fuzz_target;

/// Structured input for graph fuzzing.
#[derive(Arbitrary, Debug)]
struct GraphInput {
    /// Point coordinates on a 4096 × 4096 lattice.
    points: Vec<(u16, u16)>,
    /// Pruning angle in degrees (taken modulo 180).
    angle: u8,
    /// Minimum degree (taken modulo 6).
    min_degree: u8,
}

fuzz_target!(|input: GraphInput| {
    // Cap inputs to keep triangulation fast
    let points: Vec<Point> = input
        .points
        .iter()
        .take(64)
        .map(|&(x, y)| Point::new(f64::from(x % 4096), f64::from(y % 4096)))
        .collect();

    let mut store = TerritoryStore::from_points(&points, 55.0, 10);
    for (a, b) in delaunay_edges(&points) {
        assert!(a < b && b < points.len());
        store.connect(a, b);
    }

    prune_by_angle(&mut store, f64::from(input.angle % 180));
    let min_degree = usize::from(input.min_degree % 6);
    ensure_minimum_degree(&mut store, min_degree);
    ensure_connectivity(&mut store);

    assert!(store.is_connected());
    for (id, territory) in store.iter() {
        assert!(territory.degree() >= min_degree.min(store.len().saturating_sub(1)));
        for &other in territory.connections() {
            assert_ne!(other, id);
            assert!(store.are_connected(other, id));
        }
    }
});
