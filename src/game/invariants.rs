//! Game invariants - sanity checks that detect bugs.
//!
//! These should never trigger in a correctly implemented game: every rule in
//! the engine preserves them. Tests, fuzzers and debug builds use them as bug
//! detectors.

use crate::game::{GameState, TerritoryId};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(violations: &mut Vec<InvariantViolation>, message: String) {
    violations.push(InvariantViolation { message });
}

/// Check the graph invariants of the territory store.
///
/// Connections must be symmetric, in range and free of self-loops.
/// Connectivity is checked separately since tests build partial graphs.
#[must_use]
pub fn check_graph(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let count = state.territories.len();

    for (id, territory) in state.territories.iter() {
        for &other in territory.connections() {
            if other == id {
                violation(&mut violations, format!("Territory {id} is connected to itself"));
            } else if other >= count {
                violation(
                    &mut violations,
                    format!("Territory {id} is connected to unknown territory {other}"),
                );
            } else if !state.territories.are_connected(other, id) {
                violation(
                    &mut violations,
                    format!("Connection {id} -> {other} has no reverse edge"),
                );
            }
        }
    }

    violations
}

/// Check that every territory is reachable from territory 0.
#[must_use]
pub fn check_connectivity(state: &GameState) -> Vec<InvariantViolation> {
    let unreached: Vec<TerritoryId> = state
        .territories
        .reachable_from(0)
        .iter()
        .enumerate()
        .filter(|&(_, &seen)| !seen)
        .map(|(id, _)| id)
        .collect();

    if unreached.is_empty() || state.territories.is_empty() {
        Vec::new()
    } else {
        vec![InvariantViolation {
            message: format!("Territories {unreached:?} are unreachable from territory 0"),
        }]
    }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = check_graph(state);
    let num_players = state.players.len();

    for (id, territory) in state.territories.iter() {
        if let Some(owner) = territory.owner {
            match state.get_player(owner) {
                None => violation(
                    &mut violations,
                    format!("Territory {id} owned by unknown player {owner}"),
                ),
                Some(player) if !player.alive => violation(
                    &mut violations,
                    format!("Dead player {owner} still owns territory {id}"),
                ),
                Some(_) => {}
            }
        }
    }

    for (index, player) in state.players.iter().enumerate() {
        if usize::from(player.id) != index {
            violation(
                &mut violations,
                format!("Player at index {index} has id {}", player.id),
            );
        }
    }

    for attack in state.attacks.iter() {
        if attack.from == attack.to {
            violation(
                &mut violations,
                format!("Attack from territory {} targets itself", attack.from),
            );
        }
        if attack.from >= state.territories.len() || attack.to >= state.territories.len() {
            violation(
                &mut violations,
                format!("Attack {} -> {} references unknown territory", attack.from, attack.to),
            );
        }
        if attack.units == 0 {
            violation(
                &mut violations,
                format!("Attack {} -> {} carries no units", attack.from, attack.to),
            );
        }
        if !(0.0..=1.0).contains(&attack.progress()) {
            violation(
                &mut violations,
                format!(
                    "Attack {} -> {} has progress {}",
                    attack.from,
                    attack.to,
                    attack.progress()
                ),
            );
        }
        if usize::from(attack.owner) >= num_players {
            violation(
                &mut violations,
                format!("Attack owned by unknown player {}", attack.owner),
            );
        } else if state.get_player(attack.owner).is_some_and(|p| !p.alive) {
            violation(
                &mut violations,
                format!("Dead player {} has an attack in flight", attack.owner),
            );
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::game::{Player, Point, TerritoryStore};

    fn create_valid_game() -> GameState {
        let points = [
            Point::new(100.0, 100.0),
            Point::new(300.0, 100.0),
            Point::new(200.0, 300.0),
        ];
        let mut territories = TerritoryStore::from_points(&points, 55.0, 10);
        territories.connect(0, 1);
        territories.connect(1, 2);
        territories.connect(2, 0);
        territories.get_mut(0).unwrap().owner = Some(0);
        territories.get_mut(0).unwrap().units = 25;
        territories.get_mut(1).unwrap().owner = Some(1);
        territories.get_mut(1).unwrap().units = 25;

        let players = vec![
            Player::new(0, &PlayerConfig::human(0)),
            Player::new(1, &PlayerConfig::bot(1, 1)),
        ];
        GameState::new(territories, players, 1000)
    }

    #[test]
    fn test_valid_game_passes() {
        let mut game = create_valid_game();
        assert!(check_invariants(&game).is_empty());
        assert!(check_connectivity(&game).is_empty());

        game.launch_attack(0, 2, 0).unwrap();
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_disconnected_graph_detected() {
        let mut game = create_valid_game();
        game.territories.disconnect(2, 0);
        game.territories.disconnect(1, 2);

        let violations = check_connectivity(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("[2]"));
        // Still a well-formed graph
        assert!(check_graph(&game).is_empty());
    }

    #[test]
    fn test_empty_store_passes() {
        let game = GameState::new(TerritoryStore::new(), Vec::new(), 1000);
        assert!(check_invariants(&game).is_empty());
        assert!(check_connectivity(&game).is_empty());
    }

    #[test]
    fn test_dead_player_with_territory_detected() {
        let mut game = create_valid_game();
        // Kill the player but leave them owning territory
        game.players[1].eliminate();

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("Dead player"));
    }

    #[test]
    fn test_unknown_owner_detected() {
        let mut game = create_valid_game();
        game.territories.get_mut(2).unwrap().owner = Some(7);

        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("unknown player 7")));
    }

    #[test]
    fn test_attack_by_dead_player_detected() {
        let mut game = create_valid_game();
        game.launch_attack(1, 2, 0).unwrap();
        game.territories.get_mut(1).unwrap().owner = Some(0);
        game.players[1].eliminate();

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("attack in flight"));
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut game = create_valid_game();
        game.players[1].eliminate();
        game.territories.get_mut(2).unwrap().owner = Some(9);

        let violations = check_invariants(&game);
        assert!(violations.len() >= 2, "Should have at least 2 violations: {violations:?}");
        assert!(violations.iter().any(|v| v.message.contains("Dead player")));
        assert!(violations.iter().any(|v| v.message.contains("unknown player 9")));
    }
}
