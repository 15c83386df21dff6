//! Property-based tests for attacks and conquest resolution.
//!
//! Run with: cargo test --release prop_combat

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use conquest::game::{resolve_conquest, ActiveAttacks, ConquestOutcome};
use conquest::{Point, Territory, TerritoryStore};

const RADIUS: f64 = 55.0;
const CAP: u32 = 82;

/// A row of `n` connected territories, each owned by `owners[i]`.
fn row(owners: &[Option<u8>], units: &[u32]) -> TerritoryStore {
    let points: Vec<Point> = (0..owners.len())
        .map(|i| Point::new(100.0 + 200.0 * f64::from(u32::try_from(i).unwrap()), 300.0))
        .collect();
    let mut store = TerritoryStore::from_points(&points, RADIUS, 10);
    for i in 1..owners.len() {
        store.connect(i - 1, i);
    }
    for (i, (&owner, &u)) in owners.iter().zip(units).enumerate() {
        let t = store.get_mut(i).unwrap();
        t.owner = owner;
        t.units = u;
    }
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Hostile arrivals subtract from the garrison; the territory flips only
    /// when the attackers strictly outnumber it.
    #[test]
    fn prop_hostile_conquest_arithmetic(
        defender in prop::option::of(1u8..10),
        garrison in 0u32..=CAP,
        arriving in 1u32..10_000
    ) {
        let mut target = Territory::new(Point::new(0.0, 0.0), RADIUS, garrison);
        target.owner = defender;

        let outcome = resolve_conquest(&mut target, 0, arriving);

        if arriving > garrison {
            prop_assert_eq!(outcome, ConquestOutcome::Captured { previous_owner: defender });
            prop_assert_eq!(target.owner, Some(0));
            prop_assert_eq!(target.units, arriving - garrison);
        } else {
            prop_assert_eq!(outcome, ConquestOutcome::Held);
            prop_assert_eq!(target.owner, defender);
            prop_assert_eq!(target.units, garrison - arriving);
        }
    }

    /// Friendly arrivals reinforce up to the cap and never change owner.
    #[test]
    fn prop_reinforcement_is_capped(garrison in 0u32..=CAP, arriving in 0u32..u32::MAX) {
        let mut target = Territory::new(Point::new(0.0, 0.0), RADIUS, garrison);
        target.owner = Some(3);

        let outcome = resolve_conquest(&mut target, 3, arriving);

        prop_assert_eq!(outcome, ConquestOutcome::Reinforced);
        prop_assert_eq!(target.owner, Some(3));
        prop_assert_eq!(target.units, garrison.saturating_add(arriving).min(CAP));
    }

    /// A launch moves half the garrison (rounded up) into flight and keeps
    /// the total unit count; sources with one unit or less refuse.
    #[test]
    fn prop_launch_conserves_units(units in 0u32..=CAP, defender_units in 0u32..=CAP) {
        let mut store = row(&[Some(0), Some(1)], &[units, defender_units]);
        let mut attacks = ActiveAttacks::new(1000);

        let launched = attacks.launch(&mut store, 0, 1, 0).map(|a| a.units);

        if units <= 1 {
            prop_assert!(launched.is_none());
            prop_assert!(attacks.is_empty());
            prop_assert_eq!(store.get(0).unwrap().units, units);
        } else {
            prop_assert_eq!(launched, Some(units.div_ceil(2)));
            prop_assert_eq!(store.get(0).unwrap().units, units / 2);
            prop_assert_eq!(
                store.total_units(0) + attacks.units_in_flight(0),
                u64::from(units)
            );
        }
    }

    /// Attacks land exactly once, at launch time plus the travel time, and
    /// progress never decreases on the way.
    #[test]
    fn prop_attacks_land_once_on_time(
        duration in 1u64..5000,
        steps in prop::collection::vec(1u64..400, 1..40)
    ) {
        let mut store = row(&[Some(0), None], &[40, 5]);
        let mut attacks = ActiveAttacks::new(duration);
        attacks.launch(&mut store, 0, 1, 0).unwrap();

        let mut now = 0;
        let mut last_progress = 0.0;
        let mut landed = 0;
        for step in steps {
            now += step;
            let resolutions = attacks.advance(&mut store, now);
            landed += resolutions.len();
            if now < duration {
                prop_assert!(resolutions.is_empty());
                let progress = attacks.iter().next().unwrap().progress();
                prop_assert!(progress >= last_progress);
                prop_assert!(progress < 1.0);
                last_progress = progress;
            }
        }

        prop_assert!(landed <= 1);
        prop_assert_eq!(landed == 1, now >= duration);
        if landed == 1 {
            prop_assert!(attacks.is_empty());
            prop_assert_eq!(store.get(1).unwrap().owner, Some(0));
            prop_assert_eq!(store.get(1).unwrap().units, 15);
        }
    }

    /// Requests naming unknown territories, a neutral source or the source
    /// itself change nothing.
    #[test]
    fn prop_invalid_launches_are_noops(from in 0usize..6, to in 0usize..6) {
        let mut store = row(&[Some(0), None, Some(1)], &[30, 10, 30]);
        let before = store.clone();
        let mut attacks = ActiveAttacks::new(1000);

        let valid = from != to && from < 3 && to < 3 && from != 1;
        let launched = attacks.launch(&mut store, from, to, 0).is_some();

        prop_assert_eq!(launched, valid);
        if !valid {
            prop_assert_eq!(store, before);
            prop_assert!(attacks.is_empty());
        }
    }
}
