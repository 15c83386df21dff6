//! Procedural map generation.
//!
//! A map is built in four steps:
//! 1. [`sampler`] places well-spaced territory centres
//! 2. [`triangulate`] connects them with Delaunay edges
//! 3. [`graph`] prunes narrow edges and repairs degree and connectivity
//! 4. [`distribute`] hands out starting territories
//!
//! Everything is driven by one RNG, so a seed reproduces the map.

pub mod distribute;
pub mod graph;
pub mod sampler;
pub mod triangulate;

use rand::RngCore;
use tracing::debug;

use crate::config::MapConfig;
use crate::game::{TerritoryId, TerritoryStore};

pub use distribute::distribute_territories;
pub use graph::{build_territories, ensure_connectivity, ensure_minimum_degree, prune_by_angle};
pub use sampler::{target_spacing, Bounds, JitteredGridSampler, PointSampler, PoissonDiscSampler};
pub use triangulate::delaunay_edges;

/// A generated map: the territory graph and each player's starting territory.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMap {
    /// Territory graph with starting owners and garrisons applied.
    pub territories: TerritoryStore,
    /// Starting territory per player, `None` if the map ran out.
    pub starts: Vec<Option<TerritoryId>>,
}

/// Generate a map for `num_players` players.
pub fn generate_map(config: &MapConfig, num_players: usize, rng: &mut dyn RngCore) -> GeneratedMap {
    let requested = config.territory_count(num_players);
    let points = config.sampler.sample(config, requested, rng);
    debug!(
        requested,
        sampled = points.len(),
        sampler = ?config.sampler,
        "sampled territory centres"
    );

    let mut territories = build_territories(&points, config);
    let starts = distribute_territories(
        &mut territories,
        num_players,
        config.width,
        config.height,
        config.starting_units,
        rng,
    );

    GeneratedMap { territories, starts }
}
