//! Output formatting utilities for CLI.

// Rates and averages are computed from game counts
#![allow(clippy::cast_precision_loss)]

use conquest::{EndReason, GameResult, PlayerId};
use serde::Serialize;
use std::fmt::Write;

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    match result.winner.and_then(|w| result.player_stats.get(usize::from(w))) {
        Some(stats) => {
            let _ = writeln!(output, "  Winner: {}", stats.name);
        }
        None => output.push_str("  Winner: Draw\n"),
    }
    let reason = match result.reason {
        EndReason::Conquest => "conquest",
        EndReason::TimeLimit => "time limit",
    };
    let _ = writeln!(
        output,
        "  Ended by {reason} after {}\n",
        format_duration(result.elapsed_ms)
    );

    for stats in &result.player_stats {
        let kind = if stats.is_bot { "bot" } else { "human" };
        let _ = write!(
            output,
            "  {} ({kind}): {} territories, {} units",
            stats.name, stats.territories, stats.units
        );
        if let Some(ms) = stats.eliminated_at_ms {
            let _ = write!(output, " [eliminated at {}]", format_duration(ms));
        }
        output.push('\n');
    }

    output
}

/// `m:ss.t` rendering of a game time in milliseconds.
pub(super) fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{}:{:02}.{}", seconds / 60, seconds % 60, (ms % 1000) / 100)
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per player.
    pub(super) wins: Vec<u64>,
    /// Draw count.
    pub(super) draws: u64,
    /// Games that hit the time limit.
    pub(super) timeouts: u64,
    /// Territories held at the end, summed per player.
    total_territories: Vec<u64>,
    /// Survivals per player.
    survivals: Vec<u64>,
    /// Total game time across all games.
    total_elapsed_ms: u64,
}

impl TournamentStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; num_players],
            draws: 0,
            timeouts: 0,
            total_territories: vec![0; num_players],
            survivals: vec![0; num_players],
            total_elapsed_ms: 0,
        }
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_elapsed_ms += result.elapsed_ms;
        if result.reason == EndReason::TimeLimit {
            self.timeouts += 1;
        }

        match result.winner.map(usize::from) {
            Some(idx) if idx < self.wins.len() => self.wins[idx] += 1,
            Some(_) => {}
            None => self.draws += 1,
        }

        for (i, stats) in result.player_stats.iter().enumerate() {
            if i < self.total_territories.len() {
                self.total_territories[i] += stats.territories as u64;
                if stats.eliminated_at_ms.is_none() {
                    self.survivals[i] += 1;
                }
            }
        }
    }

    /// Merge stats accumulated on another thread.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.timeouts += other.timeouts;
        self.total_elapsed_ms += other.total_elapsed_ms;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_territories.iter_mut().zip(&other.total_territories) {
            *a += b;
        }
        for (a, b) in self.survivals.iter_mut().zip(&other.survivals) {
            *a += b;
        }
    }

    /// Get win rate for a player (0.0-1.0).
    pub(super) fn win_rate(&self, player: PlayerId) -> f64 {
        self.rate(self.wins.get(usize::from(player)).copied().unwrap_or(0))
    }

    /// Get survival rate for a player (0.0-1.0).
    pub(super) fn survival_rate(&self, player: PlayerId) -> f64 {
        self.rate(self.survivals.get(usize::from(player)).copied().unwrap_or(0))
    }

    /// Get draw rate (0.0-1.0).
    pub(super) fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    /// Get average territories held at the end of a game.
    pub(super) fn avg_territories(&self, player: PlayerId) -> f64 {
        self.rate(self.total_territories.get(usize::from(player)).copied().unwrap_or(0))
    }

    /// Get average game length in seconds of game time.
    pub(super) fn avg_seconds(&self) -> f64 {
        self.rate(self.total_elapsed_ms) / 1000.0
    }

    fn rate(&self, count: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        count as f64 / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-player statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of draws.
    draws: u64,
    /// Number of games stopped by the time limit.
    timeouts: u64,
    /// Average game length in seconds.
    avg_seconds: f64,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Player id (0-based).
    player: PlayerId,
    /// Seat name.
    name: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Survival rate (0.0-1.0).
    survival_rate: f64,
    /// Average territories held at the end.
    avg_territories: f64,
}

impl JsonTournamentResult {
    /// Create from stats and seat names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let players = seats(names)
            .map(|(id, name)| JsonTournamentPlayer {
                player: id,
                name: name.clone(),
                wins: stats.wins.get(usize::from(id)).copied().unwrap_or(0),
                win_rate: stats.win_rate(id),
                survival_rate: stats.survival_rate(id),
                avg_territories: stats.avg_territories(id),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            timeouts: stats.timeouts,
            avg_seconds: stats.avg_seconds(),
        }
    }
}

fn seats(names: &[String]) -> impl Iterator<Item = (PlayerId, &String)> {
    names
        .iter()
        .enumerate()
        .filter_map(|(i, name)| PlayerId::try_from(i).ok().map(|id| (id, name)))
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (id, name) in seats(names) {
        let wins = stats.wins.get(usize::from(id)).copied().unwrap_or(0);
        let _ = writeln!(
            output,
            "  {name}: {:.1}% ({wins} wins, survived {:.1}%)",
            stats.win_rate(id) * 100.0,
            stats.survival_rate(id) * 100.0
        );
    }
    let _ = writeln!(
        output,
        "  Draws: {} ({:.1}%)\n",
        stats.draws,
        stats.draw_rate() * 100.0
    );

    output.push_str("Average Territories Held:\n");
    for (id, name) in seats(names) {
        let _ = writeln!(output, "  {name}: {:.1}", stats.avg_territories(id));
    }

    let _ = writeln!(
        output,
        "\nAverage Game Length: {:.1}s ({} hit the time limit)",
        stats.avg_seconds(),
        stats.timeouts
    );

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("player,name,wins,win_rate,survival_rate,avg_territories\n");

    for (id, name) in seats(names) {
        let _ = writeln!(
            output,
            "{id},{name},{},{:.4},{:.4},{:.2}",
            stats.wins.get(usize::from(id)).copied().unwrap_or(0),
            stats.win_rate(id),
            stats.survival_rate(id),
            stats.avg_territories(id)
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest::PlayerStats;

    fn result(winner: Option<PlayerId>, reason: EndReason) -> GameResult {
        let stats = |id: PlayerId, territories: usize, eliminated_at_ms: Option<u64>| PlayerStats {
            player_id: id,
            name: format!("Bot {}", id + 1),
            is_bot: true,
            territories,
            units: 10,
            eliminated_at_ms,
        };
        GameResult {
            seed: 5,
            winner,
            reason,
            elapsed_ms: 61_500,
            player_stats: vec![stats(0, 12, None), stats(1, 0, Some(30_000))],
            elimination_order: vec![1],
        }
    }

    fn names() -> Vec<String> {
        vec!["Bot 1".to_string(), "Bot 2".to_string()]
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00.0");
        assert_eq!(format_duration(61_500), "1:01.5");
        assert_eq!(format_duration(600_000), "10:00.0");
    }

    #[test]
    fn test_format_text_names_winner() {
        let text = format_text(&result(Some(0), EndReason::Conquest));
        assert!(text.contains("Winner: Bot 1"));
        assert!(text.contains("conquest after 1:01.5"));
        assert!(text.contains("[eliminated at 0:30.0]"));
    }

    #[test]
    fn test_format_text_draw() {
        let text = format_text(&result(None, EndReason::TimeLimit));
        assert!(text.contains("Winner: Draw"));
        assert!(text.contains("time limit"));
    }

    #[test]
    fn test_stats_accumulate_and_merge() {
        let mut a = TournamentStats::new(2);
        a.add_result(&result(Some(0), EndReason::Conquest));
        let mut b = TournamentStats::new(2);
        b.add_result(&result(None, EndReason::TimeLimit));
        a.merge(&b);

        assert_eq!(a.games_played, 2);
        assert_eq!(a.wins, vec![1, 0]);
        assert_eq!(a.draws, 1);
        assert_eq!(a.timeouts, 1);
        assert!((a.win_rate(0) - 0.5).abs() < 1e-9);
        assert!((a.survival_rate(0) - 1.0).abs() < 1e-9);
        assert!(a.survival_rate(1).abs() < 1e-9);
        assert!((a.avg_territories(0) - 12.0).abs() < 1e-9);
        assert!((a.avg_seconds() - 61.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats_have_zero_rates() {
        let stats = TournamentStats::new(2);
        assert!(stats.win_rate(0).abs() < f64::EPSILON);
        assert!(stats.draw_rate().abs() < f64::EPSILON);
        assert!(stats.avg_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn test_csv_has_row_per_player() {
        let mut stats = TournamentStats::new(2);
        stats.add_result(&result(Some(0), EndReason::Conquest));
        let csv = format_tournament_csv(&stats, &names());

        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0,Bot 1,1,1.0000,1.0000,12.00");
        assert_eq!(lines[2], "1,Bot 2,0,0.0000,0.0000,0.00");
    }

    #[test]
    fn test_json_result_shape() {
        let mut stats = TournamentStats::new(2);
        stats.add_result(&result(Some(0), EndReason::Conquest));
        let json =
            serde_json::to_value(JsonTournamentResult::from_stats(&stats, &names())).unwrap();

        assert_eq!(json["games_played"], 1);
        assert_eq!(json["players"][0]["name"], "Bot 1");
        assert_eq!(json["players"][0]["wins"], 1);
    }
}
