//! Map command implementation.

use super::{CliError, GameOptions, OutputFormat};
use conquest::game::invariants::{check_connectivity, check_graph};
use conquest::{Simulation, Snapshot};
use std::fmt::Write;
use std::path::Path;

/// Execute the map command.
///
/// The map is generated exactly as a game with the same config would
/// generate it, then checked against the graph invariants.
///
/// # Errors
///
/// Returns an error if the config is invalid, an invariant fails, or
/// output fails.
pub(crate) fn execute(
    game: &GameOptions,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = game.resolve(config_path, 1, 3)?;
    let sim = Simulation::new(&config)?;
    let state = sim.state();

    let violations: Vec<String> = check_graph(state)
        .into_iter()
        .chain(check_connectivity(state))
        .map(|v| v.to_string())
        .collect();
    if !violations.is_empty() {
        return Err(CliError::new(violations.join("\n")));
    }

    let snapshot = sim.snapshot();
    match format {
        OutputFormat::Text => {
            let edges = state.territories.edge_count();
            print!("{}", format_map(&snapshot, config.seed, edges));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }

    Ok(())
}

fn format_map(snapshot: &Snapshot, seed: u64, edges: usize) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Map (seed: {seed}): {} territories, {edges} connections\n",
        snapshot.territories.len()
    );

    for t in &snapshot.territories {
        let owner = t.owner.and_then(|id| snapshot.players.get(usize::from(id)));
        let holder = owner.map_or("neutral", |p| p.name.as_str());
        let links: Vec<String> = t.connections.iter().map(ToString::to_string).collect();
        let _ = writeln!(
            output,
            "  #{:<3} ({:>6.1}, {:>6.1})  {:<10} {:>3}/{:<3} -> {}",
            t.id,
            t.position.x,
            t.position.y,
            holder,
            t.units,
            t.max_units,
            links.join(", ")
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest::GameConfig;

    #[test]
    fn test_format_map_lists_every_territory() {
        let config = GameConfig {
            seed: 11,
            ..GameConfig::with_counts(1, 1)
        };
        let sim = Simulation::new(&config).unwrap();
        let snapshot = sim.snapshot();
        let text = format_map(&snapshot, 11, sim.state().territories.edge_count());

        assert!(text.starts_with("Map (seed: 11)"));
        let rows = text
            .lines()
            .filter(|l| l.trim_start().starts_with('#'))
            .count();
        assert_eq!(rows, snapshot.territories.len());
        assert!(text.contains("Player 1"));
        assert!(text.contains("Bot 1"));
        assert!(text.contains("neutral"));
    }
}
