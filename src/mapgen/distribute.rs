//! Starting territory assignment.

use rand::{Rng, RngCore};
use tracing::debug;

use crate::game::{PlayerId, Point, TerritoryId, TerritoryStore};

/// Corners the first players start nearest to, in seat order: bottom-right,
/// top-left, top-right, bottom-left.
#[must_use]
pub fn corner_targets(width: f64, height: f64) -> [Point; 4] {
    [
        Point::new(width, height),
        Point::new(0.0, 0.0),
        Point::new(width, 0.0),
        Point::new(0.0, height),
    ]
}

/// Give each of `num_players` players one starting territory.
///
/// The first four players take the unowned territory nearest to their corner
/// of the `width` × `height` map, later players a random unowned one. Chosen
/// territories get the player as owner and `starting_units` units. Players
/// left without a territory (more players than territories) get `None`.
pub fn distribute_territories(
    store: &mut TerritoryStore,
    num_players: usize,
    width: f64,
    height: f64,
    starting_units: u32,
    rng: &mut dyn RngCore,
) -> Vec<Option<TerritoryId>> {
    let corners = corner_targets(width, height);
    let mut unowned: Vec<TerritoryId> = (0..store.len()).collect();
    let mut starts = Vec::with_capacity(num_players);

    for seat in 0..num_players {
        let pick = if let Some(&corner) = corners.get(seat) {
            unowned
                .iter()
                .enumerate()
                .filter_map(|(slot, &id)| Some((slot, store.get(id)?.position.distance_sq(corner))))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(slot, _)| slot)
        } else if unowned.is_empty() {
            None
        } else {
            Some(rng.random_range(0..unowned.len()))
        };

        starts.push(pick.map(|slot| unowned.remove(slot)));
    }

    for (seat, start) in starts.iter().enumerate() {
        let (Some(id), Ok(player)) = (*start, PlayerId::try_from(seat)) else {
            continue;
        };
        if let Some(territory) = store.get_mut(id) {
            territory.owner = Some(player);
            territory.units = starting_units;
        }
    }

    debug!(?starts, "distributed starting territories");
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid_store() -> TerritoryStore {
        let points: Vec<Point> = (0..12)
            .map(|i| Point::new(200.0 + f64::from(i % 4) * 500.0, 150.0 + f64::from(i / 4) * 380.0))
            .collect();
        TerritoryStore::from_points(&points, 55.0, 10)
    }

    #[test]
    fn test_first_players_take_corners() {
        let mut store = grid_store();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let starts = distribute_territories(&mut store, 4, 1920.0, 1080.0, 25, &mut rng);

        // Bottom-right, top-left, top-right, bottom-left of the 4x3 grid
        assert_eq!(starts, vec![Some(11), Some(0), Some(3), Some(8)]);
        for (seat, start) in starts.iter().enumerate() {
            let t = store.get(start.unwrap()).unwrap();
            assert_eq!(t.owner, Some(seat as PlayerId));
            assert_eq!(t.units, 25);
        }
        assert_eq!(store.iter().filter(|(_, t)| t.owner.is_none()).count(), 8);
    }

    #[test]
    fn test_extra_players_get_distinct_territories() {
        let mut store = grid_store();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let starts = distribute_territories(&mut store, 10, 1920.0, 1080.0, 25, &mut rng);

        let mut ids: Vec<_> = starts.iter().map(|s| s.unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_more_players_than_territories() {
        let points = [Point::new(100.0, 100.0), Point::new(900.0, 500.0)];
        let mut store = TerritoryStore::from_points(&points, 55.0, 10);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let starts = distribute_territories(&mut store, 5, 1000.0, 600.0, 25, &mut rng);

        assert_eq!(starts, vec![Some(1), Some(0), None, None, None]);
    }
}
