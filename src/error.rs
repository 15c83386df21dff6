//! Error types for game configuration.
//!
//! Nothing inside a running game is fatal: rejected commands are silent
//! no-ops and degenerate maps are repaired locally. The only fallible step is
//! turning a configuration into a game.

use std::fmt;

/// Error raised while loading or validating a [`GameConfig`](crate::GameConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Fewer than the minimum number of players were configured.
    TooFewPlayers(usize),
    /// More than the maximum number of players were configured.
    TooManyPlayers(usize),
    /// The map has no usable area once the margin is removed.
    InvalidMapDimensions {
        /// Logical map width.
        width: f64,
        /// Logical map height.
        height: f64,
        /// Margin kept free on every side.
        margin: f64,
    },
    /// Territory radius must be positive and finite.
    InvalidTerritoryRadius(f64),
    /// Point spacing multiplier must be positive and finite.
    InvalidDensification(f64),
    /// A timing parameter was zero.
    InvalidTiming(&'static str),
    /// A probability fell outside `[0, 1]`.
    InvalidProbability {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The configuration file is not valid JSON for a game config.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPlayers(n) => write!(f, "Too few players: {n} (minimum 2)"),
            Self::TooManyPlayers(n) => write!(f, "Too many players: {n} (maximum 10)"),
            Self::InvalidMapDimensions {
                width,
                height,
                margin,
            } => write!(
                f,
                "Invalid map dimensions {width}x{height} with margin {margin}: no usable area"
            ),
            Self::InvalidTerritoryRadius(r) => write!(f, "Invalid territory radius: {r}"),
            Self::InvalidDensification(k) => write!(f, "Invalid densification: {k}"),
            Self::InvalidTiming(name) => write!(f, "Invalid timing: {name} must be positive"),
            Self::InvalidProbability { name, value } => {
                write!(f, "Invalid probability for {name}: {value} (expected 0..=1)")
            }
            Self::Io(e) => write!(f, "Failed to read config: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
