//! Conquest CLI - Command-line interface for running and watching Conquest games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Conquest - A real-time territory conquest simulation
#[derive(Parser, Debug)]
#[command(name = "conquest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON game config file (missing fields use defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one game to completion on a virtual clock
    Run {
        #[command(flatten)]
        game: cli::GameOptions,

        /// Game time limit in seconds (default: 600)
        #[arg(short, long, default_value = "600")]
        time_limit: u64,

        /// Virtual milliseconds per frame
        #[arg(long, default_value = "16")]
        frame_ms: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Interactive TUI to play or spectate a game in real time
    Watch {
        #[command(flatten)]
        game: cli::GameOptions,

        /// Spectate a bots-only game instead of playing seat 1
        #[arg(long)]
        spectate: bool,
    },

    /// Run many bot-only games in parallel and aggregate statistics
    Tournament {
        #[command(flatten)]
        game: cli::GameOptions,

        /// Number of games to run
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Game time limit in seconds per game
        #[arg(short, long, default_value = "600")]
        time_limit: u64,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Generate a map and print it
    Map {
        #[command(flatten)]
        game: cli::GameOptions,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

/// Install a stderr log subscriber. `RUST_LOG` wins unless `-v` is given.
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = args.config.as_deref();

    // The viewer owns the terminal, log lines would tear its frames
    if !matches!(args.command, Commands::Watch { .. }) {
        init_tracing(args.verbose);
    }

    let result = match args.command {
        Commands::Run {
            game,
            time_limit,
            frame_ms,
            format,
        } => cli::run::execute(&game, config, time_limit, frame_ms, format),

        Commands::Watch { game, spectate } => cli::watch::execute(&game, config, spectate),

        Commands::Tournament {
            game,
            games,
            threads,
            time_limit,
            format,
            progress,
        } => cli::tournament::execute(&game, config, games, threads, time_limit, format, progress),

        Commands::Map { game, format } => cli::map::execute(&game, config, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
