//! Tournament command implementation.

// Throughput is reported from game counts
#![allow(clippy::cast_precision_loss)]

use super::output::{
    format_tournament_csv, format_tournament_text, JsonTournamentResult, TournamentStats,
};
use super::{player_names, CliError, GameOptions, TournamentFormat};
use conquest::{run_game, RunConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Execute the tournament command.
///
/// Game `i` uses seed `base + i`. Human seats are allowed but never act,
/// so most tournaments are bots only (the default is four bots).
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
pub(crate) fn execute(
    game: &GameOptions,
    config_path: Option<&Path>,
    games: u64,
    threads: Option<usize>,
    time_limit_secs: u64,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = game.resolve(config_path, 0, 4)?;
    let names = player_names(&config);
    let run = RunConfig {
        time_limit_ms: time_limit_secs.saturating_mul(1000),
        ..RunConfig::default()
    };

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let base_seed = config.seed;
    let num_players = names.len();

    // Each thread accumulates into its own TournamentStats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(num_players),
            |mut local_stats, i| {
                if let Ok(result) = run_game(base_seed.wrapping_add(i), &config, &run) {
                    local_stats.add_result(&result);
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || TournamentStats::new(num_players),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!("Duration: {:.2}s ({:.0} games/sec)", duration.as_secs_f64(), games_per_sec);
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &names);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &names));
        }
    }

    Ok(())
}
