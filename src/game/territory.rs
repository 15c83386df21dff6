//! Territories and the store that owns them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// Stable identity of a territory: its index in the [`TerritoryStore`].
pub type TerritoryId = usize;

/// A position on the logical map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downwards).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Bearing from `self` towards `other` in radians, in `(-π, π]`.
    #[must_use]
    pub fn bearing(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// A controllable node of the map graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    /// Position on the logical map, fixed after generation.
    pub position: Point,
    /// Size of the territory.
    pub radius: f64,
    /// Owning player (`None` = neutral).
    pub owner: Option<PlayerId>,
    /// Current garrison.
    pub units: u32,
    /// Growth cap, `floor(radius * 1.5)`.
    max_units: u32,
    /// Neighbouring territories. Only the store edits this, keeping it symmetric.
    connections: BTreeSet<TerritoryId>,
}

impl Territory {
    /// Create an unconnected neutral territory.
    #[must_use]
    pub fn new(position: Point, radius: f64, units: u32) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_units = (radius * 1.5).floor().max(0.0) as u32;

        Self {
            position,
            radius,
            owner: None,
            units,
            max_units,
            connections: BTreeSet::new(),
        }
    }

    /// Growth cap of this territory.
    #[must_use]
    pub const fn max_units(&self) -> u32 {
        self.max_units
    }

    /// Neighbouring territories in ascending index order.
    #[must_use]
    pub const fn connections(&self) -> &BTreeSet<TerritoryId> {
        &self.connections
    }

    /// Number of neighbours.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    /// Whether `other` is a neighbour.
    #[must_use]
    pub fn is_connected_to(&self, other: TerritoryId) -> bool {
        self.connections.contains(&other)
    }

    /// Whether `player` owns this territory.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}

/// Insertion-ordered collection of all territories.
///
/// This is the single source of truth for ownership and unit counts. Edges
/// are only added or removed through [`connect`](Self::connect) and
/// [`disconnect`](Self::disconnect), which update both endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerritoryStore {
    territories: Vec<Territory>,
}

impl TerritoryStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            territories: Vec::new(),
        }
    }

    /// Create one neutral, unconnected territory per point.
    #[must_use]
    pub fn from_points(points: &[Point], radius: f64, units: u32) -> Self {
        Self {
            territories: points
                .iter()
                .map(|&p| Territory::new(p, radius, units))
                .collect(),
        }
    }

    /// Number of territories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.territories.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    /// Get a territory by id.
    #[must_use]
    pub fn get(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(id)
    }

    /// Get a mutable territory by id. Connections stay read-only.
    #[must_use]
    pub fn get_mut(&mut self, id: TerritoryId) -> Option<&mut Territory> {
        self.territories.get_mut(id)
    }

    /// Iterate over ids and territories in index order.
    pub fn iter(&self) -> impl Iterator<Item = (TerritoryId, &Territory)> {
        self.territories.iter().enumerate()
    }

    /// Iterate mutably over all territories in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Territory> {
        self.territories.iter_mut()
    }

    /// All territories as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Territory] {
        &self.territories
    }

    /// Add the undirected edge `a - b`.
    ///
    /// Returns `false` for self-loops, unknown ids, or existing edges.
    pub fn connect(&mut self, a: TerritoryId, b: TerritoryId) -> bool {
        if a == b || a >= self.len() || b >= self.len() {
            return false;
        }
        let added = self.territories[a].connections.insert(b);
        self.territories[b].connections.insert(a);
        added
    }

    /// Remove the undirected edge `a - b`, returning whether it existed.
    pub fn disconnect(&mut self, a: TerritoryId, b: TerritoryId) -> bool {
        if a >= self.len() || b >= self.len() {
            return false;
        }
        let removed = self.territories[a].connections.remove(&b);
        self.territories[b].connections.remove(&a);
        removed
    }

    /// Whether the edge `a - b` exists.
    #[must_use]
    pub fn are_connected(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.get(a).is_some_and(|t| t.is_connected_to(b))
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.territories.iter().map(Territory::degree).sum::<usize>() / 2
    }

    /// All undirected edges as `(low, high)` pairs in ascending order.
    #[must_use]
    pub fn edges(&self) -> Vec<(TerritoryId, TerritoryId)> {
        self.iter()
            .flat_map(|(a, t)| {
                t.connections
                    .iter()
                    .filter(move |&&b| a < b)
                    .map(move |&b| (a, b))
            })
            .collect()
    }

    /// Mark every territory reachable from `start` along connections.
    #[must_use]
    pub fn reachable_from(&self, start: TerritoryId) -> Vec<bool> {
        let mut visited = vec![false; self.len()];
        if start >= self.len() {
            return visited;
        }

        let mut stack = vec![start];
        visited[start] = true;
        while let Some(current) = stack.pop() {
            for &next in &self.territories[current].connections {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        visited
    }

    /// Whether every territory is reachable from territory 0.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.is_empty() || self.reachable_from(0).into_iter().all(|v| v)
    }

    /// Territories owned by `player`.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = (TerritoryId, &Territory)> {
        self.iter().filter(move |(_, t)| t.is_owned_by(player))
    }

    /// Number of territories owned by `player`.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId) -> usize {
        self.owned_by(player).count()
    }

    /// Sum of units garrisoned by `player`.
    #[must_use]
    pub fn total_units(&self, player: PlayerId) -> u64 {
        self.owned_by(player).map(|(_, t)| u64::from(t.units)).sum()
    }

    /// Whether any neighbour of `id` is not owned by `player`.
    #[must_use]
    pub fn has_foreign_neighbour(&self, id: TerritoryId, player: PlayerId) -> bool {
        self.get(id).is_some_and(|t| {
            t.connections
                .iter()
                .any(|&n| !self.territories[n].is_owned_by(player))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_store(n: usize) -> TerritoryStore {
        let points: Vec<Point> = (0..n)
            .map(|i| Point::new(100.0 * i as f64, 0.0))
            .collect();
        TerritoryStore::from_points(&points, 55.0, 10)
    }

    #[test]
    fn test_max_units_derived_from_radius() {
        let t = Territory::new(Point::new(0.0, 0.0), 55.0, 10);
        assert_eq!(t.max_units(), 82);

        let t = Territory::new(Point::new(0.0, 0.0), 10.0, 10);
        assert_eq!(t.max_units(), 15);
    }

    #[test]
    fn test_point_geometry() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
        assert!((a.distance_sq(b) - 25.0).abs() < 1e-9);
        assert!((a.bearing(Point::new(0.0, 1.0)) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

        let mid = a.lerp(b, 0.5);
        assert!((mid.x - 1.5).abs() < 1e-9);
        assert!((mid.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_connect_is_symmetric() {
        let mut store = line_store(3);
        assert!(store.connect(0, 1));
        assert!(store.are_connected(0, 1));
        assert!(store.are_connected(1, 0));
        assert_eq!(store.edge_count(), 1);

        // Duplicate edge
        assert!(!store.connect(1, 0));
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_connect_rejects_invalid() {
        let mut store = line_store(2);
        assert!(!store.connect(0, 0));
        assert!(!store.connect(0, 5));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_disconnect_is_symmetric() {
        let mut store = line_store(3);
        store.connect(0, 1);
        store.connect(1, 2);

        assert!(store.disconnect(1, 0));
        assert!(!store.are_connected(0, 1));
        assert!(!store.are_connected(1, 0));
        assert!(store.are_connected(1, 2));
        assert!(!store.disconnect(1, 0));
    }

    #[test]
    fn test_reachability() {
        let mut store = line_store(4);
        store.connect(0, 1);
        store.connect(2, 3);

        let reached = store.reachable_from(0);
        assert_eq!(reached, vec![true, true, false, false]);
        assert!(!store.is_connected());

        store.connect(1, 2);
        assert!(store.is_connected());
    }

    #[test]
    fn test_empty_and_single_are_connected() {
        assert!(TerritoryStore::new().is_connected());
        assert!(line_store(1).is_connected());
    }

    #[test]
    fn test_edges_listed_once() {
        let mut store = line_store(3);
        store.connect(2, 0);
        store.connect(1, 2);
        assert_eq!(store.edges(), vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_ownership_queries() {
        let mut store = line_store(3);
        store.connect(0, 1);
        store.connect(1, 2);
        for id in [0, 1] {
            let t = store.get_mut(id).unwrap();
            t.owner = Some(0);
            t.units = 20;
        }

        assert_eq!(store.count_owned(0), 2);
        assert_eq!(store.count_owned(1), 0);
        assert_eq!(store.total_units(0), 40);
        assert!(!store.has_foreign_neighbour(0, 0));
        assert!(store.has_foreign_neighbour(1, 0));
    }
}
