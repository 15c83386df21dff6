// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Conquest: a real-time territory conquest simulation on a generated graph.
//!
//! This crate provides a deterministic game engine designed for:
//! - Procedural maps of well-spaced territories joined by Delaunay edges
//! - Real-time play driven by virtual time, so runs are reproducible
//! - Bots and humans sharing the same attack rules
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Runner / Driver (headless, TUI)   │
//! ├─────────────────────────────────────┤
//! │  Simulation (schedule, bots, input) │
//! ├─────────────────────────────────────┤
//! │  Game (territories, attacks, win)   │
//! ├─────────────────────────────────────┤
//! │  Map generation (sample, triangulate│
//! │  prune, repair, distribute)         │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod mapgen;
pub mod runner;
pub mod sim;
pub mod snapshot;

pub use config::{
    BotConfig, BotPolicyKind, GameConfig, MapConfig, PlayerConfig, SamplerKind, TimingConfig,
};
pub use error::ConfigError;

// Re-export key game types at crate root for convenience
pub use game::{
    Attack, GameOutcome, GameState, GameStatus, Player, PlayerId, Point, Territory, TerritoryId,
    TerritoryStore,
};
pub use runner::{run_game, EndReason, GameResult, PlayerStats, RunConfig};
pub use sim::{Driver, ManualClock, Simulation, SystemClock, TickReport};
pub use snapshot::Snapshot;
