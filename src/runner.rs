//! Headless game runner.
//!
//! Provides a pure function interface: `(seed, config) -> GameResult`.
//! Games run on virtual time with a fixed frame step, so the same inputs
//! always produce the same result.

use serde::Serialize;
use tracing::info;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{GameOutcome, GameStatus, PlayerId};
use crate::sim::Simulation;

/// Frame step and time limit for a headless game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Virtual milliseconds per frame.
    pub frame_ms: u64,
    /// Game time after which the game is stopped and scored.
    pub time_limit_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            time_limit_ms: 600_000,
        }
    }
}

/// Why a game finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// At most one player survived.
    Conquest,
    /// The time limit was reached first.
    TimeLimit,
}

/// Statistics for a single player at the end of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    /// Player identifier.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Whether a bot played this seat.
    pub is_bot: bool,
    /// Territories held at the end.
    pub territories: usize,
    /// Units garrisoned plus in flight at the end.
    pub units: u64,
    /// Game time of elimination (None if survived).
    pub eliminated_at_ms: Option<u64>,
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The seed used for this game.
    pub seed: u64,
    /// The winning player (None if draw).
    pub winner: Option<PlayerId>,
    /// Why the game finished.
    pub reason: EndReason,
    /// Game time played.
    pub elapsed_ms: u64,
    /// Per-player statistics, by id.
    pub player_stats: Vec<PlayerStats>,
    /// Elimination order (first eliminated is index 0).
    pub elimination_order: Vec<PlayerId>,
}

/// Run a complete game with the given seed.
///
/// The seed replaces `config.seed`. Human seats receive no orders and only
/// defend. When the time limit is hit the game is stopped and the living
/// player holding the most territories wins; a tie is a draw.
///
/// # Errors
///
/// Returns an error if the config is invalid.
pub fn run_game(
    seed: u64,
    config: &GameConfig,
    run: &RunConfig,
) -> Result<GameResult, ConfigError> {
    let config = GameConfig {
        seed,
        ..config.clone()
    };
    let mut sim = Simulation::new(&config)?;
    let frame_ms = run.frame_ms.max(1);

    let mut eliminated_at: Vec<Option<u64>> = vec![None; config.num_players()];
    let mut elimination_order = Vec::new();

    while sim.is_active() && sim.elapsed_ms() < run.time_limit_ms {
        let step = frame_ms.min(run.time_limit_ms - sim.elapsed_ms());
        let report = sim.tick_ms(step);
        for player in report.eliminated {
            if let Some(slot) = eliminated_at.get_mut(usize::from(player)) {
                *slot = Some(sim.elapsed_ms());
            }
            elimination_order.push(player);
        }
    }

    let (winner, reason) = match sim.status() {
        GameStatus::Ended(GameOutcome::Winner(id)) => (Some(id), EndReason::Conquest),
        GameStatus::Ended(GameOutcome::Draw) => (None, EndReason::Conquest),
        GameStatus::Active | GameStatus::Stopped => {
            sim.stop();
            (territory_leader(&sim), EndReason::TimeLimit)
        }
    };

    let state = sim.state();
    let player_stats = state
        .players
        .iter()
        .map(|p| PlayerStats {
            player_id: p.id,
            name: p.name.clone(),
            is_bot: p.is_bot,
            territories: state.territories.count_owned(p.id),
            units: state.territories.total_units(p.id) + state.attacks.units_in_flight(p.id),
            eliminated_at_ms: eliminated_at.get(usize::from(p.id)).copied().flatten(),
        })
        .collect();

    info!(seed, ?winner, ?reason, elapsed_ms = sim.elapsed_ms(), "game finished");

    Ok(GameResult {
        seed,
        winner,
        reason,
        elapsed_ms: sim.elapsed_ms(),
        player_stats,
        elimination_order,
    })
}

/// The living player with strictly the most territories.
fn territory_leader(sim: &Simulation) -> Option<PlayerId> {
    let state = sim.state();
    let mut counts: Vec<(PlayerId, usize)> = state
        .alive_players()
        .map(|p| (p.id, state.territories.count_owned(p.id)))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    match counts.as_slice() {
        [(id, _)] => Some(*id),
        [(id, first), (_, second), ..] if first > second => Some(*id),
        _ => None,
    }
}
