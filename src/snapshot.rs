//! Read-only views of a running game for renderers and JSON output.

use serde::Serialize;

use crate::game::{
    Attack, GameOutcome, GameState, GameStatus, Player, PlayerId, Point, Territory, TerritoryId,
};

/// One territory as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerritoryView {
    /// Index in the territory list.
    pub id: TerritoryId,
    /// Centre on the logical map.
    pub position: Point,
    /// Drawing radius.
    pub radius: f64,
    /// Owning player, `None` when neutral.
    pub owner: Option<PlayerId>,
    /// Garrison.
    pub units: u32,
    /// Growth cap.
    pub max_units: u32,
    /// Neighbour indices, ascending.
    pub connections: Vec<TerritoryId>,
}

impl TerritoryView {
    fn new(id: TerritoryId, territory: &Territory) -> Self {
        Self {
            id,
            position: territory.position,
            radius: territory.radius,
            owner: territory.owner,
            units: territory.units,
            max_units: territory.max_units(),
            connections: territory.connections().iter().copied().collect(),
        }
    }
}

/// One player with summary counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Whether a bot plays this seat.
    pub is_bot: bool,
    /// Whether the player is still in the game.
    pub alive: bool,
    /// Territories held.
    pub territories: usize,
    /// Units garrisoned plus units in flight.
    pub units: u64,
}

impl PlayerView {
    fn new(player: &Player, state: &GameState) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            color: player.color.clone(),
            is_bot: player.is_bot,
            alive: player.alive,
            territories: state.territories.count_owned(player.id),
            units: state.territories.total_units(player.id)
                + state.attacks.units_in_flight(player.id),
        }
    }
}

/// One attack in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackView {
    /// Source territory.
    pub from: TerritoryId,
    /// Target territory.
    pub to: TerritoryId,
    /// Attacking player.
    pub owner: PlayerId,
    /// Units carried.
    pub units: u32,
    /// Travel progress in `[0, 1]`.
    pub progress: f64,
    /// Current position between source and target centres.
    pub position: Point,
}

impl AttackView {
    fn new(attack: &Attack, state: &GameState) -> Self {
        let endpoints = (
            state.territories.get(attack.from),
            state.territories.get(attack.to),
        );
        let position = match endpoints {
            (Some(from), Some(to)) => from.position.lerp(to.position, attack.progress()),
            _ => Point::default(),
        };
        Self {
            from: attack.from,
            to: attack.to,
            owner: attack.owner,
            units: attack.units,
            progress: attack.progress(),
            position,
        }
    }
}

/// Consistent picture of a game between ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Virtual time since the game started.
    pub elapsed_ms: u64,
    /// Lifecycle state, with the outcome once ended.
    pub status: GameStatus,
    /// Every territory, by index.
    pub territories: Vec<TerritoryView>,
    /// Every player, by id.
    pub players: Vec<PlayerView>,
    /// Attacks in flight, oldest first.
    pub attacks: Vec<AttackView>,
}

impl Snapshot {
    /// Capture `state` at `elapsed_ms`.
    #[must_use]
    pub fn capture(state: &GameState, elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            status: state.status(),
            territories: state
                .territories
                .iter()
                .map(|(id, t)| TerritoryView::new(id, t))
                .collect(),
            players: state.players.iter().map(|p| PlayerView::new(p, state)).collect(),
            attacks: state.attacks.iter().map(|a| AttackView::new(a, state)).collect(),
        }
    }

    /// Whether the game is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    /// The winner, once the game has ended with one.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Ended(GameOutcome::Winner(id)) => Some(id),
            _ => None,
        }
    }
}
