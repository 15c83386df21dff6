//! Game state management.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::game::{ActiveAttacks, Attack, Player, PlayerId, TerritoryId, TerritoryStore};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "player", rename_all = "snake_case")]
pub enum GameOutcome {
    /// Exactly one player survived.
    Winner(PlayerId),
    /// Nobody survived.
    Draw,
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum GameStatus {
    /// Ticks mutate the game.
    Active,
    /// At most one player is left. Terminal.
    Ended(GameOutcome),
    /// Stopped from outside before it ended. Terminal.
    Stopped,
}

/// Result of one win evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinCheck {
    /// Players eliminated by this evaluation, in id order.
    pub eliminated: Vec<PlayerId>,
    /// Set when this evaluation ended the game.
    pub outcome: Option<GameOutcome>,
}

/// Complete game state: territories, players and attacks in flight.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The map graph with ownership and garrisons.
    pub territories: TerritoryStore,
    /// All players in the game, indexed by id.
    pub players: Vec<Player>,
    /// Attacks in flight.
    pub attacks: ActiveAttacks,
    status: GameStatus,
}

impl GameState {
    /// Create an active game.
    #[must_use]
    pub fn new(territories: TerritoryStore, players: Vec<Player>, attack_duration_ms: u64) -> Self {
        Self {
            territories,
            players,
            attacks: ActiveAttacks::new(attack_duration_ms),
            status: GameStatus::Active,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether ticks still mutate the game.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    /// Stop an active game. Ended games keep their outcome.
    pub fn stop(&mut self) {
        if self.is_active() {
            self.status = GameStatus::Stopped;
        }
    }

    /// Get a player by id.
    #[must_use]
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    /// Get all alive players.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    /// Number of players still alive.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    /// Launch an attack at time `now`; see [`ActiveAttacks::launch`].
    pub fn launch_attack(
        &mut self,
        from: TerritoryId,
        to: TerritoryId,
        now: u64,
    ) -> Option<&Attack> {
        if !self.is_active() {
            return None;
        }
        self.attacks.launch(&mut self.territories, from, to, now)
    }

    /// Grow every owned territory below its cap by one unit.
    ///
    /// Returns the number of territories that grew.
    pub fn grow_units(&mut self) -> usize {
        if !self.is_active() {
            return 0;
        }

        let mut grown = 0;
        for territory in self.territories.iter_mut() {
            if territory.owner.is_some() && territory.units < territory.max_units() {
                territory.units += 1;
                grown += 1;
            }
        }
        grown
    }

    /// Eliminate players left with no territory and no attack in flight, and
    /// end the game once at most one player is alive.
    pub fn evaluate_win(&mut self) -> WinCheck {
        let mut check = WinCheck::default();
        if !self.is_active() {
            return check;
        }

        let holders: BTreeSet<PlayerId> = self
            .territories
            .iter()
            .filter_map(|(_, t)| t.owner)
            .collect();

        for player in &mut self.players {
            if player.alive
                && !holders.contains(&player.id)
                && !self.attacks.has_attacks_by(player.id)
            {
                player.eliminate();
                info!(player = player.id, name = %player.name, "player eliminated");
                check.eliminated.push(player.id);
            }
        }

        let mut alive = self.players.iter().filter(|p| p.alive);
        let first = alive.next();
        if alive.next().is_none() {
            let outcome = first.map_or(GameOutcome::Draw, |p| GameOutcome::Winner(p.id));
            info!(?outcome, "game over");
            self.status = GameStatus::Ended(outcome);
            check.outcome = Some(outcome);
        }

        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::game::Point;

    /// Three territories in a row: 0 owned by player 0, 2 owned by player 1.
    fn create_test_game() -> GameState {
        let points = [
            Point::new(100.0, 100.0),
            Point::new(300.0, 100.0),
            Point::new(500.0, 100.0),
        ];
        let mut territories = TerritoryStore::from_points(&points, 55.0, 10);
        territories.connect(0, 1);
        territories.connect(1, 2);

        let t = territories.get_mut(0).unwrap();
        t.owner = Some(0);
        t.units = 25;
        let t = territories.get_mut(2).unwrap();
        t.owner = Some(1);
        t.units = 25;

        let players = vec![
            Player::new(0, &PlayerConfig::human(0)),
            Player::new(1, &PlayerConfig::bot(1, 1)),
        ];

        GameState::new(territories, players, 1000)
    }

    #[test]
    fn test_game_state_creation() {
        let game = create_test_game();
        assert!(game.is_active());
        assert_eq!(game.alive_count(), 2);
        assert!(game.attacks.is_empty());
    }

    #[test]
    fn test_growth_only_owned_below_cap() {
        let mut game = create_test_game();
        game.territories.get_mut(2).unwrap().units = 82;

        let grown = game.grow_units();
        assert_eq!(grown, 1);
        assert_eq!(game.territories.get(0).unwrap().units, 26);
        // Neutral does not grow
        assert_eq!(game.territories.get(1).unwrap().units, 10);
        // Capped territory does not grow
        assert_eq!(game.territories.get(2).unwrap().units, 82);
    }

    #[test]
    fn test_no_elimination_while_holding() {
        let mut game = create_test_game();
        let check = game.evaluate_win();
        assert!(check.eliminated.is_empty());
        assert!(check.outcome.is_none());
        assert!(game.is_active());
    }

    #[test]
    fn test_elimination_without_territory_or_attacks() {
        let mut game = create_test_game();
        game.territories.get_mut(2).unwrap().owner = Some(0);

        let check = game.evaluate_win();
        assert_eq!(check.eliminated, vec![1]);
        assert_eq!(check.outcome, Some(GameOutcome::Winner(0)));
        assert_eq!(game.status(), GameStatus::Ended(GameOutcome::Winner(0)));
        assert!(!game.get_player(1).unwrap().alive);
    }

    #[test]
    fn test_attack_in_flight_keeps_player_alive() {
        let mut game = create_test_game();
        // Player 1 launches its last garrison and then loses the territory
        game.launch_attack(2, 1, 0).unwrap();
        game.territories.get_mut(2).unwrap().owner = Some(0);

        let check = game.evaluate_win();
        assert!(check.eliminated.is_empty());
        assert!(game.get_player(1).unwrap().alive);
        assert!(game.is_active());

        // The attack lands on a neutral territory and captures it
        game.attacks.advance(&mut game.territories, 1000);
        let check = game.evaluate_win();
        assert!(check.eliminated.is_empty());
        assert_eq!(game.territories.get(1).unwrap().owner, Some(1));
    }

    #[test]
    fn test_failed_last_attack_eliminates() {
        let mut game = create_test_game();
        game.territories.get_mut(1).unwrap().units = 80;
        game.launch_attack(2, 1, 0).unwrap();
        game.territories.get_mut(2).unwrap().owner = Some(0);
        assert!(game.evaluate_win().eliminated.is_empty());

        game.attacks.advance(&mut game.territories, 1000);
        let check = game.evaluate_win();
        assert_eq!(check.eliminated, vec![1]);
        assert_eq!(check.outcome, Some(GameOutcome::Winner(0)));
    }

    #[test]
    fn test_draw_when_nobody_survives() {
        let mut game = create_test_game();
        game.territories.get_mut(0).unwrap().owner = None;
        game.territories.get_mut(2).unwrap().owner = None;

        let check = game.evaluate_win();
        assert_eq!(check.eliminated, vec![0, 1]);
        assert_eq!(check.outcome, Some(GameOutcome::Draw));
    }

    #[test]
    fn test_ended_game_is_terminal() {
        let mut game = create_test_game();
        game.territories.get_mut(2).unwrap().owner = Some(0);
        game.evaluate_win();
        assert!(!game.is_active());

        let before = game.territories.clone();
        assert_eq!(game.grow_units(), 0);
        assert!(game.launch_attack(0, 1, 0).is_none());
        assert_eq!(game.territories, before);
        assert_eq!(game.evaluate_win(), WinCheck::default());
    }

    #[test]
    fn test_stop_keeps_outcome_of_ended_game() {
        let mut game = create_test_game();
        game.stop();
        assert_eq!(game.status(), GameStatus::Stopped);

        let mut game = create_test_game();
        game.territories.get_mut(2).unwrap().owner = Some(0);
        game.evaluate_win();
        game.stop();
        assert_eq!(game.status(), GameStatus::Ended(GameOutcome::Winner(0)));
    }
}
