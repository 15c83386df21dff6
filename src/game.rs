//! Game layer for Conquest.
//!
//! Implements the rules on top of the territory graph:
//! - Territories with owners, garrisons and connections
//! - Players and elimination
//! - Attacks in flight and conquest resolution
//! - Bot policies and human selection

mod attack;
mod bot;
pub mod invariants;
mod player;
mod selection;
mod state;
mod territory;

pub use attack::{resolve_conquest, ActiveAttacks, Attack, ConquestOutcome, Resolution};
pub use bot::{policy_for, run_bots, BotPolicy, FrontlinePolicy, SingleChoicePolicy};
pub use player::{Player, PlayerId};
pub use selection::Selections;
pub use state::{GameOutcome, GameState, GameStatus, WinCheck};
pub use territory::{Point, Territory, TerritoryId, TerritoryStore};
