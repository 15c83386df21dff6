//! The game loop: one owner of all game state, advanced in virtual time.

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::invariants::assert_invariants;
use crate::game::{
    policy_for, run_bots, BotPolicy, GameOutcome, GameState, GameStatus, Player, PlayerId,
    Resolution, Selections, TerritoryId,
};
use crate::mapgen::generate_map;
use crate::sim::clock::{Schedule, ScheduledEffect};
use crate::snapshot::Snapshot;

/// RNG stream used for bot decisions; map generation uses stream 0.
const BOT_STREAM: u64 = 1;

/// A human attack order waiting for the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueuedAttack {
    player: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
}

/// What happened during one call to [`Simulation::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Queued human attacks that were launched.
    pub human_launches: usize,
    /// Growth firings executed.
    pub growth_ticks: usize,
    /// Bot firings executed.
    pub bot_turns: usize,
    /// Attacks launched by bots.
    pub bot_launches: usize,
    /// Attacks that landed, in creation order.
    pub resolutions: Vec<Resolution>,
    /// Players eliminated this tick.
    pub eliminated: Vec<PlayerId>,
    /// Set when this tick ended the game.
    pub outcome: Option<GameOutcome>,
}

/// A running game.
///
/// All mutation happens inside [`tick`](Self::tick): queued human orders
/// first, then every due growth and bot firing in time order, then the frame
/// step that lands attacks and evaluates the win condition.
#[derive(Debug)]
pub struct Simulation {
    state: GameState,
    schedule: Schedule,
    selections: Selections,
    pending: VecDeque<QueuedAttack>,
    policy: Box<dyn BotPolicy>,
    bot_rng: ChaCha8Rng,
    elapsed_ms: u64,
    config: GameConfig,
}

impl Simulation {
    /// Generate a map and start a game from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut map_rng = ChaCha8Rng::seed_from_u64(config.seed);
        let map = generate_map(&config.map, config.num_players(), &mut map_rng);

        let players: Vec<Player> = config
            .players
            .iter()
            .enumerate()
            .filter_map(|(i, p)| Some(Player::new(PlayerId::try_from(i).ok()?, p)))
            .collect();

        info!(
            seed = config.seed,
            players = players.len(),
            territories = map.territories.len(),
            "game started"
        );

        let state = GameState::new(map.territories, players, config.timing.attack_duration_ms);
        Ok(Self::from_state(state, config))
    }

    /// Run a game over a prepared state.
    ///
    /// The state's attack duration is kept; timing for growth and bots and
    /// the bot policy come from `config`.
    #[must_use]
    pub fn from_state(state: GameState, config: &GameConfig) -> Self {
        let mut bot_rng = ChaCha8Rng::seed_from_u64(config.seed);
        bot_rng.set_stream(BOT_STREAM);

        Self {
            selections: Selections::new(state.players.len()),
            state,
            schedule: Schedule::new(&config.timing),
            pending: VecDeque::new(),
            policy: policy_for(&config.bot),
            bot_rng,
            elapsed_ms: 0,
            config: config.clone(),
        }
    }

    /// The configuration the game was started with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read access to the game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Virtual time since the game started.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Whether ticks still mutate the game.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Consistent view of the game for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.elapsed_ms)
    }

    /// Stop the game. Pending orders are dropped and nothing fires again.
    pub fn stop(&mut self) {
        if self.state.is_active() {
            info!(elapsed_ms = self.elapsed_ms, "game stopped");
        }
        self.state.stop();
        self.schedule.cancel();
        self.pending.clear();
    }

    /// Queue an attack order from a human player for the next tick.
    ///
    /// The order is validated when it is applied: the player must be a
    /// living human owning `from`, and `to` must be a neighbour of `from`.
    /// Invalid orders are dropped silently. Returns whether the order was
    /// queued, which only fails once the game is over.
    pub fn queue_attack(&mut self, player: PlayerId, from: TerritoryId, to: TerritoryId) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.pending.push_back(QueuedAttack { player, from, to });
        true
    }

    /// Select a territory for `player`; returns the launch targets.
    pub fn select(&mut self, player: PlayerId, territory: TerritoryId) -> Vec<TerritoryId> {
        self.selections.select(&self.state, player, territory)
    }

    /// Current selection of `player`.
    #[must_use]
    pub fn selected(&self, player: PlayerId) -> Option<TerritoryId> {
        self.selections.selected(player)
    }

    /// Launch targets of the current selection of `player`.
    #[must_use]
    pub fn targets(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.selections.targets(&self.state, player)
    }

    /// Act on `target` for `player`: queue an attack from the selection when
    /// `target` neighbours it, otherwise select `target`.
    ///
    /// Returns whether an attack was queued.
    pub fn command(&mut self, player: PlayerId, target: TerritoryId) -> bool {
        match self.selections.command(&self.state, player, target) {
            Some((from, to)) => self.queue_attack(player, from, to),
            None => false,
        }
    }

    /// Advance the game by `delta` of virtual time.
    pub fn tick(&mut self, delta: Duration) -> TickReport {
        self.tick_ms(u64::try_from(delta.as_millis()).unwrap_or(u64::MAX))
    }

    /// Advance the game by `delta_ms` milliseconds of virtual time.
    pub fn tick_ms(&mut self, delta_ms: u64) -> TickReport {
        let mut report = TickReport::default();
        if !self.state.is_active() {
            return report;
        }

        report.human_launches = self.apply_pending();

        let target = self.elapsed_ms.saturating_add(delta_ms);
        for (at, effect) in self.schedule.due(target) {
            if !self.state.is_active() {
                break;
            }
            match effect {
                ScheduledEffect::Growth => {
                    self.state.grow_units();
                    report.growth_ticks += 1;
                }
                ScheduledEffect::Bots => {
                    report.bot_launches +=
                        run_bots(self.policy.as_ref(), &mut self.state, at, &mut self.bot_rng);
                    report.bot_turns += 1;
                }
            }
        }

        self.elapsed_ms = target;
        report.resolutions = self.state.attacks.advance(&mut self.state.territories, target);

        let check = self.state.evaluate_win();
        report.eliminated = check.eliminated;
        report.outcome = check.outcome;
        self.selections.prune(&self.state);

        if let Some(outcome) = report.outcome {
            debug!(?outcome, elapsed_ms = target, "schedule cancelled at game end");
            self.schedule.cancel();
            self.pending.clear();
        }

        assert_invariants(&self.state);
        report
    }

    fn apply_pending(&mut self) -> usize {
        let now = self.elapsed_ms;
        let mut launched = 0;

        while let Some(order) = self.pending.pop_front() {
            let allowed = self
                .state
                .get_player(order.player)
                .is_some_and(Player::is_active_human)
                && self
                    .state
                    .territories
                    .get(order.from)
                    .is_some_and(|t| t.is_owned_by(order.player) && t.is_connected_to(order.to));

            if allowed && self.state.launch_attack(order.from, order.to, now).is_some() {
                launched += 1;
            }
        }

        launched
    }
}
