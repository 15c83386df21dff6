#![no_main]

//! Full simulation fuzzer.
//!
//! Plays a generated game with fuzzer-chosen frame lengths and human
//! commands, checking every invariant after each tick. This catches
//! integration bugs that the component fuzzers miss.

use arbitrary::Arbitrary;
use conquest::game::invariants::check_invariants;
use conquest::{GameConfig, Simulation};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated input event.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzEvent {
    /// Advance virtual time.
    Tick { ms: u16 },
    /// Select or command a territory as a player.
    Command { player: u8, territory: u8 },
    /// Queue a raw attack order.
    Order { player: u8, from: u8, to: u8 },
    /// Stop the game.
    Stop,
}

/// Structured input for simulation fuzzing.
#[derive(Arbitrary, Debug)]
struct SimulationInput {
    /// Map and bot seed.
    seed: u64,
    /// Human seats (taken modulo 3).
    humans: u8,
    /// Bot seats (taken modulo 5).
    bots: u8,
    /// Events applied in order.
    events: Vec<FuzzEvent>,
}

fuzz_target!(|input: SimulationInput| {
    let config = GameConfig {
        seed: input.seed,
        ..GameConfig::with_counts(usize::from(input.humans % 3), usize::from(input.bots % 5))
    };
    let Ok(mut sim) = Simulation::new(&config) else {
        return;
    };

    for event in input.events.into_iter().take(200) {
        match event {
            FuzzEvent::Tick { ms } => {
                sim.tick_ms(u64::from(ms));
            }
            FuzzEvent::Command { player, territory } => {
                sim.command(player % 4, usize::from(territory));
            }
            FuzzEvent::Order { player, from, to } => {
                sim.queue_attack(player % 4, usize::from(from), usize::from(to));
            }
            FuzzEvent::Stop => sim.stop(),
        }

        let violations = check_invariants(sim.state());
        assert!(violations.is_empty(), "{violations:?}");
    }
});
