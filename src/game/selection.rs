//! Per-player territory selection for human input.

use crate::game::{GameState, PlayerId, TerritoryId};

/// One optional selected territory per player, stored by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    selected: Vec<Option<TerritoryId>>,
}

impl Selections {
    /// Empty selections for `num_players` players.
    #[must_use]
    pub fn new(num_players: usize) -> Self {
        Self {
            selected: vec![None; num_players],
        }
    }

    /// The territory currently selected by `player`.
    #[must_use]
    pub fn selected(&self, player: PlayerId) -> Option<TerritoryId> {
        self.selected.get(usize::from(player)).copied().flatten()
    }

    /// Clear the selection of `player`.
    pub fn clear(&mut self, player: PlayerId) {
        if let Some(slot) = self.selected.get_mut(usize::from(player)) {
            *slot = None;
        }
    }

    /// Select `territory` for `player` and return its neighbours as launch targets.
    ///
    /// Only a living human may select, and only a territory they own; any
    /// other request clears the player's selection and returns no targets.
    pub fn select(
        &mut self,
        state: &GameState,
        player: PlayerId,
        territory: TerritoryId,
    ) -> Vec<TerritoryId> {
        self.clear(player);

        let can_select = state.get_player(player).is_some_and(|p| p.is_active_human())
            && state.territories.get(territory).is_some_and(|t| t.is_owned_by(player));
        if !can_select {
            return Vec::new();
        }

        let Some(slot) = self.selected.get_mut(usize::from(player)) else {
            return Vec::new();
        };
        *slot = Some(territory);
        self.targets(state, player)
    }

    /// Launch targets of the current selection of `player`.
    #[must_use]
    pub fn targets(&self, state: &GameState, player: PlayerId) -> Vec<TerritoryId> {
        self.selected(player)
            .and_then(|id| state.territories.get(id))
            .map(|t| t.connections().iter().copied().collect())
            .unwrap_or_default()
    }

    /// Act on `target` for `player`.
    ///
    /// When `target` is a neighbour of the selection the selection is cleared
    /// and the `(from, to)` pair to launch is returned. Otherwise `target` is
    /// treated as a new selection.
    pub fn command(
        &mut self,
        state: &GameState,
        player: PlayerId,
        target: TerritoryId,
    ) -> Option<(TerritoryId, TerritoryId)> {
        if let Some(from) = self.selected(player)
            && state.territories.are_connected(from, target)
        {
            self.clear(player);
            return Some((from, target));
        }

        self.select(state, player, target);
        None
    }

    /// Drop selections that are no longer valid: the territory changed hands
    /// or the player is out of the game.
    pub fn prune(&mut self, state: &GameState) {
        for (index, slot) in self.selected.iter_mut().enumerate() {
            let Some(id) = *slot else {
                continue;
            };
            let Ok(player) = PlayerId::try_from(index) else {
                *slot = None;
                continue;
            };
            let still_valid = state.get_player(player).is_some_and(|p| p.is_active_human())
                && state.territories.get(id).is_some_and(|t| t.is_owned_by(player));
            if !still_valid {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::game::{Player, Point, TerritoryStore};

    /// 0 - 1 - 2 chain: human 0 owns 0, human 1 owns 2, bot 2 owns nothing.
    fn create_test_game() -> GameState {
        let points: Vec<Point> = (0..3).map(|i| Point::new(200.0 * f64::from(i), 0.0)).collect();
        let mut territories = TerritoryStore::from_points(&points, 55.0, 10);
        territories.connect(0, 1);
        territories.connect(1, 2);
        territories.get_mut(0).unwrap().owner = Some(0);
        territories.get_mut(2).unwrap().owner = Some(1);

        let players = vec![
            Player::new(0, &PlayerConfig::human(0)),
            Player::new(1, &PlayerConfig::human(1)),
            Player::new(2, &PlayerConfig::bot(2, 1)),
        ];
        GameState::new(territories, players, 1000)
    }

    #[test]
    fn test_select_own_territory() {
        let state = create_test_game();
        let mut selections = Selections::new(3);

        let targets = selections.select(&state, 0, 0);
        assert_eq!(targets, vec![1]);
        assert_eq!(selections.selected(0), Some(0));
        // Other players are unaffected
        assert_eq!(selections.selected(1), None);
    }

    #[test]
    fn test_select_foreign_territory_clears() {
        let state = create_test_game();
        let mut selections = Selections::new(3);
        selections.select(&state, 0, 0);

        assert!(selections.select(&state, 0, 2).is_empty());
        assert_eq!(selections.selected(0), None);
        assert!(selections.select(&state, 0, 1).is_empty());
        assert!(selections.select(&state, 0, 99).is_empty());
    }

    #[test]
    fn test_selections_are_per_player() {
        let state = create_test_game();
        let mut selections = Selections::new(3);

        selections.select(&state, 0, 0);
        selections.select(&state, 1, 2);
        assert_eq!(selections.selected(0), Some(0));
        assert_eq!(selections.selected(1), Some(2));
    }

    #[test]
    fn test_bot_cannot_select() {
        let mut state = create_test_game();
        state.territories.get_mut(1).unwrap().owner = Some(2);
        let mut selections = Selections::new(3);

        assert!(selections.select(&state, 2, 1).is_empty());
        assert_eq!(selections.selected(2), None);
    }

    #[test]
    fn test_command_neighbour_returns_launch() {
        let state = create_test_game();
        let mut selections = Selections::new(3);
        selections.select(&state, 0, 0);

        assert_eq!(selections.command(&state, 0, 1), Some((0, 1)));
        assert_eq!(selections.selected(0), None);
    }

    #[test]
    fn test_command_non_neighbour_reselects() {
        let mut state = create_test_game();
        state.territories.get_mut(1).unwrap().owner = Some(0);
        let mut selections = Selections::new(3);

        // Nothing selected: command acts as select
        assert_eq!(selections.command(&state, 0, 1), None);
        assert_eq!(selections.selected(0), Some(1));

        // 0 -> 2 are not connected: reselect fails and clears
        selections.select(&state, 0, 0);
        assert_eq!(selections.command(&state, 0, 2), None);
        assert_eq!(selections.selected(0), None);
    }

    #[test]
    fn test_prune_drops_lost_territory() {
        let mut state = create_test_game();
        let mut selections = Selections::new(3);
        selections.select(&state, 0, 0);
        selections.select(&state, 1, 2);

        state.territories.get_mut(0).unwrap().owner = Some(1);
        selections.prune(&state);
        assert_eq!(selections.selected(0), None);
        assert_eq!(selections.selected(1), Some(2));

        state.players[1].eliminate();
        selections.prune(&state);
        assert_eq!(selections.selected(1), None);
    }
}
