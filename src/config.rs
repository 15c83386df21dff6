//! Game configuration.
//!
//! A [`GameConfig`] is read once when a game starts. Every section has
//! defaults matching the classic browser game, so a config file only needs
//! to name what it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum number of players in a game.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a game.
pub const MAX_PLAYERS: usize = 10;

/// Colors handed out to players that do not pick their own.
pub const DEFAULT_PLAYER_COLORS: [&str; 10] = [
    "#3b82f6", "#ef4444", "#22c55e", "#eab308", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#64748b", "#d946ef",
];

/// One entry of the ordered player list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,
    /// Display color as a `#rrggbb` hex string.
    pub color: String,
    /// Whether the bot controller plays this seat.
    pub is_bot: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            color: DEFAULT_PLAYER_COLORS[0].to_string(),
            is_bot: false,
        }
    }
}

impl PlayerConfig {
    /// A human seat with the default color for position `index`.
    #[must_use]
    pub fn human(index: usize) -> Self {
        Self {
            name: format!("Player {}", index + 1),
            color: default_color(index),
            is_bot: false,
        }
    }

    /// A bot seat with the default color for position `index`.
    #[must_use]
    pub fn bot(index: usize, bot_number: usize) -> Self {
        Self {
            name: format!("Bot {bot_number}"),
            color: default_color(index),
            is_bot: true,
        }
    }
}

fn default_color(index: usize) -> String {
    DEFAULT_PLAYER_COLORS[index % DEFAULT_PLAYER_COLORS.len()].to_string()
}

/// Point distribution strategy used by map generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerKind {
    /// Poisson-disc dart throwing with a spatial grid.
    #[default]
    PoissonDisc,
    /// One jittered point per grid cell followed by a relaxation pass.
    JitteredGrid,
}

/// Map generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Logical map width.
    pub width: f64,
    /// Logical map height.
    pub height: f64,
    /// Space kept free along every edge.
    pub margin: f64,
    /// Radius of every territory; `max_units` is `floor(radius * 1.5)`.
    pub territory_radius: f64,
    /// Lower bound on the number of territories requested.
    pub min_territories: usize,
    /// Territories requested per player when that exceeds the lower bound.
    pub territories_per_player: usize,
    /// Garrison of neutral territories at game start.
    pub neutral_units: u32,
    /// Garrison of each player's starting territory.
    pub starting_units: u32,
    /// Multiplier applied to the ideal point spacing.
    pub densification: f64,
    /// Candidate placements tried around an active point before it retires.
    pub placement_attempts: u32,
    /// Neighbours closer in bearing than this (degrees) get pruned.
    pub min_connection_angle_deg: f64,
    /// Every territory is topped up to at least this many connections.
    pub min_degree: usize,
    /// Point distribution strategy.
    pub sampler: SamplerKind,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            margin: 100.0,
            territory_radius: 55.0,
            min_territories: 15,
            territories_per_player: 5,
            neutral_units: 10,
            starting_units: 25,
            densification: 1.2,
            placement_attempts: 30,
            min_connection_angle_deg: 45.0,
            min_degree: 2,
            sampler: SamplerKind::PoissonDisc,
        }
    }
}

impl MapConfig {
    /// Number of territories requested for `num_players` players.
    #[must_use]
    pub fn territory_count(&self, num_players: usize) -> usize {
        self.min_territories
            .max(num_players.saturating_mul(self.territories_per_player))
    }
}

/// Cadence of the simulation's periodic effects, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Time an attack takes to travel from source to target.
    pub attack_duration_ms: u64,
    /// Period of the unit growth tick.
    pub unit_interval_ms: u64,
    /// Period of the bot decision tick.
    pub bot_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            attack_duration_ms: 1000,
            unit_interval_ms: 1000,
            bot_interval_ms: 1200,
        }
    }
}

/// Which bot decision procedure to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotPolicyKind {
    /// Attack from every strong front, then maybe reinforce the weakest front.
    #[default]
    Frontline,
    /// One weighted roll per tick picks attack, reinforce or consolidate.
    SingleChoice,
}

/// Bot heuristics thresholds and probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Decision procedure.
    pub policy: BotPolicyKind,
    /// A territory needs at least this many units to attack from.
    pub expansion_min_units: u32,
    /// Source must exceed the target by more than this many units.
    pub expansion_margin: u32,
    /// Chance that a chosen expansion attack is actually launched.
    pub expansion_chance: f64,
    /// Backline territories need more than this many units to reinforce.
    pub backline_min_units: u32,
    /// Backline must exceed the frontline by more than this many units.
    pub reinforce_margin: u32,
    /// Chance that a chosen reinforcement is actually launched.
    pub reinforce_chance: f64,
    /// Single-choice policy: rolls below this attack.
    pub single_choice_attack: f64,
    /// Single-choice policy: rolls below this (and above attack) reinforce.
    pub single_choice_reinforce: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            policy: BotPolicyKind::Frontline,
            expansion_min_units: 15,
            expansion_margin: 3,
            expansion_chance: 0.4,
            backline_min_units: 30,
            reinforce_margin: 10,
            reinforce_chance: 0.2,
            single_choice_attack: 0.6,
            single_choice_reinforce: 0.9,
        }
    }
}

/// Complete configuration for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Ordered player list; a player's id is its position.
    pub players: Vec<PlayerConfig>,
    /// Map generation parameters.
    pub map: MapConfig,
    /// Simulation cadence.
    pub timing: TimingConfig,
    /// Bot heuristics.
    pub bot: BotConfig,
    /// Seed for map generation and bot decisions.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: vec![PlayerConfig::human(0), PlayerConfig::bot(1, 1)],
            map: MapConfig::default(),
            timing: TimingConfig::default(),
            bot: BotConfig::default(),
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Build a config with `humans` human seats followed by `bots` bot seats.
    #[must_use]
    pub fn with_counts(humans: usize, bots: usize) -> Self {
        let players = (0..humans)
            .map(PlayerConfig::human)
            .chain((0..bots).map(|b| PlayerConfig::bot(humans + b, b + 1)))
            .collect();

        Self {
            players,
            ..Self::default()
        }
    }

    /// Parse a config from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the config is invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or the
    /// config is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of configured players.
    #[must_use]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Check that the config describes a playable game.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.players.len();
        if n < MIN_PLAYERS {
            return Err(ConfigError::TooFewPlayers(n));
        }
        if n > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers(n));
        }

        let map = &self.map;
        let usable = map.width - 2.0 * map.margin > 0.0 && map.height - 2.0 * map.margin > 0.0;
        if !usable || !map.width.is_finite() || !map.height.is_finite() || map.margin < 0.0 {
            return Err(ConfigError::InvalidMapDimensions {
                width: map.width,
                height: map.height,
                margin: map.margin,
            });
        }
        if !(map.territory_radius.is_finite() && map.territory_radius > 0.0) {
            return Err(ConfigError::InvalidTerritoryRadius(map.territory_radius));
        }
        if !(map.densification.is_finite() && map.densification > 0.0) {
            return Err(ConfigError::InvalidDensification(map.densification));
        }

        let timing = &self.timing;
        if timing.attack_duration_ms == 0 {
            return Err(ConfigError::InvalidTiming("attack_duration_ms"));
        }
        if timing.unit_interval_ms == 0 {
            return Err(ConfigError::InvalidTiming("unit_interval_ms"));
        }
        if timing.bot_interval_ms == 0 {
            return Err(ConfigError::InvalidTiming("bot_interval_ms"));
        }

        let bot = &self.bot;
        for (name, value) in [
            ("expansion_chance", bot.expansion_chance),
            ("reinforce_chance", bot.reinforce_chance),
            ("single_choice_attack", bot.single_choice_attack),
            ("single_choice_reinforce", bot.single_choice_reinforce),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        Ok(())
    }
}
