//! Territory graph construction and repair.

use tracing::debug;

use crate::config::MapConfig;
use crate::game::{Point, TerritoryId, TerritoryStore};
use crate::mapgen::triangulate::delaunay_edges;

/// Build the territory graph over `points`.
///
/// Territories start neutral with the configured garrison. Edges come from
/// the Delaunay triangulation, are thinned by angle and then repaired so that
/// every territory has the minimum degree and the graph is connected.
#[must_use]
pub fn build_territories(points: &[Point], config: &MapConfig) -> TerritoryStore {
    let mut store =
        TerritoryStore::from_points(points, config.territory_radius, config.neutral_units);

    for (a, b) in delaunay_edges(points) {
        store.connect(a, b);
    }
    let triangulated = store.edge_count();

    let pruned = prune_by_angle(&mut store, config.min_connection_angle_deg);
    let topped_up = ensure_minimum_degree(&mut store, config.min_degree);
    let bridged = ensure_connectivity(&mut store);

    debug!(
        territories = store.len(),
        triangulated, pruned, topped_up, bridged, "built territory graph"
    );
    store
}

/// Remove the farther of every pair of neighbours whose bearings from a
/// territory differ by less than `min_angle_deg`.
///
/// Territories are processed in index order, each against the graph as left
/// by the previous ones. Equal distances drop the larger index.
///
/// Returns the number of edges removed.
pub fn prune_by_angle(store: &mut TerritoryStore, min_angle_deg: f64) -> usize {
    let min_angle = min_angle_deg.to_radians();
    let mut removed = 0;

    for id in 0..store.len() {
        let Some(territory) = store.get(id) else {
            continue;
        };
        if territory.degree() < 2 {
            continue;
        }

        let origin = territory.position;
        let mut neighbours: Vec<(TerritoryId, f64, f64)> = territory
            .connections()
            .iter()
            .filter_map(|&n| {
                let p = store.get(n)?.position;
                Some((n, origin.bearing(p), origin.distance(p)))
            })
            .collect();
        neighbours.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut drop = Vec::new();
        for i in 0..neighbours.len() {
            let current = neighbours[i];
            let next = neighbours[(i + 1) % neighbours.len()];
            if current.0 == next.0 {
                continue;
            }

            let mut gap = (current.1 - next.1).abs();
            if gap > std::f64::consts::PI {
                gap = std::f64::consts::TAU - gap;
            }
            if gap >= min_angle {
                continue;
            }

            let farther = match current.2.total_cmp(&next.2) {
                std::cmp::Ordering::Greater => current.0,
                std::cmp::Ordering::Less => next.0,
                std::cmp::Ordering::Equal => current.0.max(next.0),
            };
            if !drop.contains(&farther) {
                drop.push(farther);
            }
        }

        for n in drop {
            if store.disconnect(id, n) {
                removed += 1;
            }
        }
    }

    removed
}

/// Connect every territory with fewer than `min_degree` connections to its
/// nearest unconnected territories until it reaches `min_degree` or runs out
/// of candidates.
///
/// Returns the number of edges added.
pub fn ensure_minimum_degree(store: &mut TerritoryStore, min_degree: usize) -> usize {
    let mut added = 0;

    for id in 0..store.len() {
        while store.get(id).is_some_and(|t| t.degree() < min_degree) {
            let Some(nearest) = nearest_where(store, id, |candidate| {
                candidate != id && !store.are_connected(id, candidate)
            }) else {
                break;
            };
            store.connect(id, nearest);
            added += 1;
        }
    }

    added
}

/// Bridge every territory unreachable from territory 0 to its nearest
/// reachable territory, repeating until the graph is connected.
///
/// Each round adds at least one edge into the reached component, so the loop
/// is capped at the territory count.
///
/// Returns the number of edges added.
pub fn ensure_connectivity(store: &mut TerritoryStore) -> usize {
    if store.len() < 2 {
        return 0;
    }

    let mut added = 0;
    for _ in 0..store.len() {
        let reached = store.reachable_from(0);
        let unreached: Vec<TerritoryId> = (0..store.len()).filter(|&id| !reached[id]).collect();
        if unreached.is_empty() {
            break;
        }

        for id in unreached {
            if let Some(nearest) = nearest_where(store, id, |candidate| reached[candidate]) {
                store.connect(id, nearest);
                added += 1;
            }
        }
    }

    added
}

/// Nearest territory to `id` accepted by `accept`; the lower index wins ties.
fn nearest_where(
    store: &TerritoryStore,
    id: TerritoryId,
    accept: impl Fn(TerritoryId) -> bool,
) -> Option<TerritoryId> {
    let origin = store.get(id)?.position;
    let mut best: Option<(TerritoryId, f64)> = None;

    for (candidate, territory) in store.iter() {
        if !accept(candidate) {
            continue;
        }
        let distance = origin.distance_sq(territory.position);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(candidate, _)| candidate)
}
