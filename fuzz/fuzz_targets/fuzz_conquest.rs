#![no_main]

use arbitrary::Arbitrary;
use conquest::game::{resolve_conquest, ConquestOutcome};
use conquest::{Point, Territory};
use libfuzzer_sys::fuzz_target;

/// Structured input for conquest fuzzing.
#[derive(Arbitrary, Debug)]
struct ConquestInput {
    /// Territory radius, scaled down to a sane range.
    radius: u16,
    /// Defender owner (`None` = neutral).
    defender: Option<u8>,
    /// Defender garrison.
    garrison: u32,
    /// Attacking player.
    attacker: u8,
    /// Units arriving.
    arriving: u32,
}

fuzz_target!(|input: ConquestInput| {
    let radius = f64::from(input.radius % 500) / 2.0;
    let mut target = Territory::new(Point::new(0.0, 0.0), radius, input.garrison);
    target.owner = input.defender;
    let cap = target.max_units();

    let before = target.clone();
    let outcome = resolve_conquest(&mut target, input.attacker, input.arriving);

    match outcome {
        ConquestOutcome::Reinforced => {
            assert_eq!(before.owner, Some(input.attacker));
            assert_eq!(target.owner, before.owner);
            assert!(target.units <= cap.max(before.units));
        }
        ConquestOutcome::Held => {
            assert_ne!(before.owner, Some(input.attacker));
            assert_eq!(target.owner, before.owner);
            assert_eq!(target.units, before.units - input.arriving);
        }
        ConquestOutcome::Captured { previous_owner } => {
            assert_eq!(previous_owner, before.owner);
            assert_eq!(target.owner, Some(input.attacker));
            assert_eq!(target.units, input.arriving - before.units);
        }
    }
});
