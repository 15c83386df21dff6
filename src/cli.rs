//! CLI command implementations for Conquest.

pub(crate) mod map;
pub(crate) mod run;
pub(crate) mod tournament;
pub(crate) mod watch;

mod output;

use clap::{Args, ValueEnum};
use conquest::{ConfigError, GameConfig};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` and `map` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Flags shared by every command that sets up a game.
#[derive(Debug, Clone, Args)]
pub(crate) struct GameOptions {
    /// Random seed (default: config file seed, else random)
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Number of human seats, listed first
    #[arg(long)]
    pub(crate) humans: Option<usize>,

    /// Number of bot seats
    #[arg(short, long)]
    pub(crate) bots: Option<usize>,

    /// Map width in pixels
    #[arg(long)]
    pub(crate) width: Option<f64>,

    /// Map height in pixels
    #[arg(long)]
    pub(crate) height: Option<f64>,
}

impl GameOptions {
    /// Build the game config: file (or defaults), then flag overrides.
    ///
    /// Without a config file the seats default to `humans` humans followed
    /// by `bots` bots.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the result is invalid.
    pub(crate) fn resolve(
        &self,
        config_path: Option<&Path>,
        humans: usize,
        bots: usize,
    ) -> Result<GameConfig, CliError> {
        let mut config = match config_path {
            Some(path) => GameConfig::from_json_file(path).map_err(|e| {
                CliError::new(format!("Failed to load {}: {e}", path.display()))
            })?,
            None => GameConfig {
                seed: random_seed(),
                ..GameConfig::with_counts(humans, bots)
            },
        };

        if self.humans.is_some() || self.bots.is_some() {
            let current_bots = config.players.iter().filter(|p| p.is_bot).count();
            let current_humans = config.players.len() - current_bots;
            let humans = self.humans.unwrap_or(current_humans);
            let bots = self.bots.unwrap_or(current_bots);
            config.players = GameConfig::with_counts(humans, bots).players;
        }
        if let Some(width) = self.width {
            config.map.width = width;
        }
        if let Some(height) = self.height {
            config.map.height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Seed from the wall clock, for runs that do not name one.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Display names of the configured seats, in player order.
pub(crate) fn player_names(config: &GameConfig) -> Vec<String> {
    config.players.iter().map(|p| p.name.clone()).collect()
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_flags() -> GameOptions {
        GameOptions {
            seed: None,
            humans: None,
            bots: None,
            width: None,
            height: None,
        }
    }

    #[test]
    fn test_defaults_use_requested_seats() {
        let config = no_flags().resolve(None, 1, 3).unwrap();
        assert_eq!(config.num_players(), 4);
        assert!(!config.players[0].is_bot);
        assert!(config.players[1..].iter().all(|p| p.is_bot));
    }

    #[test]
    fn test_flags_override_seats_and_seed() {
        let options = GameOptions {
            seed: Some(9),
            bots: Some(5),
            width: Some(1000.0),
            ..no_flags()
        };
        let config = options.resolve(None, 1, 1).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.num_players(), 6);
        assert!((config.map.width - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"seed": 77, "players": [{{"name": "A", "is_bot": true}}, {{"name": "B", "is_bot": true}}]}}"#
        )
        .unwrap();

        let config = no_flags().resolve(Some(file.path()), 1, 1).unwrap();
        assert_eq!(config.seed, 77);
        assert_eq!(player_names(&config), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let options = GameOptions {
            humans: Some(0),
            bots: Some(1),
            ..no_flags()
        };
        let err = options.resolve(None, 1, 1).unwrap_err();
        assert!(err.to_string().contains("player"), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = no_flags()
            .resolve(Some(Path::new("/nonexistent/conquest.json")), 1, 1)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load"));
    }
}
