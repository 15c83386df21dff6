//! Player state management.

use crate::config::PlayerConfig;

/// Unique identifier for a player: its position in the configured player list.
pub type PlayerId = u8;

/// State for a single player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Display color as a `#rrggbb` hex string.
    pub color: String,
    /// Whether the bot controller plays this player.
    pub is_bot: bool,
    /// Whether the player is still in the game.
    pub alive: bool,
}

impl Player {
    /// Create a living player from its configuration entry.
    #[must_use]
    pub fn new(id: PlayerId, config: &PlayerConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            color: config.color.clone(),
            is_bot: config.is_bot,
            alive: true,
        }
    }

    /// Eliminate this player. Elimination is permanent for the game.
    pub fn eliminate(&mut self) {
        self.alive = false;
    }

    /// Whether this is a living human player.
    #[must_use]
    pub const fn is_active_human(&self) -> bool {
        self.alive && !self.is_bot
    }

    /// Whether this is a living bot player.
    #[must_use]
    pub const fn is_active_bot(&self) -> bool {
        self.alive && self.is_bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(3, &PlayerConfig::bot(3, 2));
        assert_eq!(player.id, 3);
        assert_eq!(player.name, "Bot 2");
        assert!(player.is_bot);
        assert!(player.alive);
        assert!(player.is_active_bot());
        assert!(!player.is_active_human());
    }

    #[test]
    fn test_player_eliminate() {
        let mut player = Player::new(0, &PlayerConfig::human(0));
        assert!(player.is_active_human());

        player.eliminate();
        assert!(!player.alive);
        assert!(!player.is_active_human());
    }
}
