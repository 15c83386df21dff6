//! Run command implementation.

use super::output::format_text;
use super::{player_names, CliError, GameOptions, OutputFormat};
use conquest::{run_game, RunConfig};
use std::path::Path;

/// Execute the run command.
///
/// Defaults to four bots when neither the config file nor the flags name
/// the seats.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
pub(crate) fn execute(
    game: &GameOptions,
    config_path: Option<&Path>,
    time_limit_secs: u64,
    frame_ms: u64,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = game.resolve(config_path, 0, 4)?;
    let run = RunConfig {
        frame_ms,
        time_limit_ms: time_limit_secs.saturating_mul(1000),
    };

    if format == OutputFormat::Text {
        println!("Running game with seed {}...", config.seed);
        println!("Players: {}", player_names(&config).join(", "));
        println!();
    }

    let result = run_game(config.seed, &config, &run)?;

    match format {
        OutputFormat::Text => print!("{}", format_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
