//! Attack lifecycle and conquest resolution.
//!
//! An attack carries half of its source garrison (rounded up) towards a
//! target and lands after a fixed travel time. Landing on a friendly
//! territory reinforces it up to its cap; landing anywhere else subtracts the
//! attackers from the garrison and flips ownership once the garrison goes
//! negative.

use std::cmp::Ordering;

use tracing::trace;

use crate::game::{PlayerId, Territory, TerritoryId, TerritoryStore};

/// An attack in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    /// Source territory.
    pub from: TerritoryId,
    /// Target territory.
    pub to: TerritoryId,
    /// Player who launched the attack.
    pub owner: PlayerId,
    /// Units carried, fixed at launch.
    pub units: u32,
    /// Simulation time of launch, in milliseconds.
    started_at: u64,
    /// Travel progress in `[0, 1]`.
    progress: f64,
}

impl Attack {
    /// Simulation time of launch, in milliseconds.
    #[must_use]
    pub const fn started_at(&self) -> u64 {
        self.started_at
    }

    /// Travel progress in `[0, 1]`.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether the attack has arrived.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.progress >= 1.0
    }

    /// Recompute progress for time `now`. Progress never decreases.
    fn advance(&mut self, now: u64, duration_ms: u64) {
        let elapsed = now.saturating_sub(self.started_at);
        #[allow(clippy::cast_precision_loss)]
        let progress = (elapsed as f64 / duration_ms.max(1) as f64).min(1.0);
        self.progress = self.progress.max(progress);
    }
}

/// What happened to a territory when an attack landed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConquestOutcome {
    /// Friendly units arrived and were added up to the cap.
    Reinforced,
    /// The defender kept the territory, possibly with zero units.
    Held,
    /// The attacker took the territory.
    Captured {
        /// Owner before the capture (`None` = was neutral).
        previous_owner: Option<PlayerId>,
    },
}

/// Apply `units` arriving units owned by `attacker` to `target`.
///
/// Ownership is compared against the target's owner at arrival, not at
/// launch, so a territory that changed hands in the meantime is fought over.
pub fn resolve_conquest(target: &mut Territory, attacker: PlayerId, units: u32) -> ConquestOutcome {
    if target.owner == Some(attacker) {
        target.units = target.units.saturating_add(units).min(target.max_units());
        return ConquestOutcome::Reinforced;
    }

    match units.cmp(&target.units) {
        Ordering::Greater => {
            let previous_owner = target.owner;
            target.owner = Some(attacker);
            target.units = units - target.units;
            ConquestOutcome::Captured { previous_owner }
        }
        Ordering::Less | Ordering::Equal => {
            target.units -= units;
            ConquestOutcome::Held
        }
    }
}

/// An attack that landed this tick and what it did.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The attack as it was on arrival.
    pub attack: Attack,
    /// Effect on the target territory.
    pub outcome: ConquestOutcome,
}

/// All attacks in flight, in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAttacks {
    attacks: Vec<Attack>,
    duration_ms: u64,
}

impl ActiveAttacks {
    /// Create an empty set of attacks that take `duration_ms` to land.
    #[must_use]
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            attacks: Vec::new(),
            duration_ms,
        }
    }

    /// Travel time of every attack.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Launch an attack from `from` to `to` at time `now`.
    ///
    /// Requests with an unknown index, `from == to`, a neutral source, or a
    /// source holding one unit or fewer are ignored and return `None`.
    pub fn launch(
        &mut self,
        territories: &mut TerritoryStore,
        from: TerritoryId,
        to: TerritoryId,
        now: u64,
    ) -> Option<&Attack> {
        if from == to || territories.get(to).is_none() {
            return None;
        }
        let source = territories.get_mut(from)?;
        let owner = source.owner?;
        if source.units <= 1 {
            return None;
        }

        let units = source.units.div_ceil(2);
        source.units -= units;

        trace!(from, to, owner, units, now, "attack launched");
        self.attacks.push(Attack {
            from,
            to,
            owner,
            units,
            started_at: now,
            progress: 0.0,
        });
        self.attacks.last()
    }

    /// Advance every attack to time `now` and resolve the ones that arrived.
    ///
    /// Arrivals are resolved in creation order and removed exactly once.
    pub fn advance(&mut self, territories: &mut TerritoryStore, now: u64) -> Vec<Resolution> {
        let duration_ms = self.duration_ms;
        let mut resolutions = Vec::new();

        self.attacks.retain_mut(|attack| {
            attack.advance(now, duration_ms);
            if !attack.has_arrived() {
                return true;
            }

            if let Some(target) = territories.get_mut(attack.to) {
                let outcome = resolve_conquest(target, attack.owner, attack.units);
                trace!(
                    from = attack.from,
                    to = attack.to,
                    owner = attack.owner,
                    units = attack.units,
                    ?outcome,
                    "attack resolved"
                );
                resolutions.push(Resolution {
                    attack: attack.clone(),
                    outcome,
                });
            }
            false
        });

        resolutions
    }

    /// Drop every attack without resolving it.
    pub fn clear(&mut self) {
        self.attacks.clear();
    }

    /// Attacks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Attack> {
        self.attacks.iter()
    }

    /// Attacks as a slice, in creation order.
    #[must_use]
    pub fn as_slice(&self) -> &[Attack] {
        &self.attacks
    }

    /// Number of attacks in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    /// Whether no attack is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// Whether `player` has any attack in flight.
    #[must_use]
    pub fn has_attacks_by(&self, player: PlayerId) -> bool {
        self.attacks.iter().any(|a| a.owner == player)
    }

    /// Units `player` has in flight.
    #[must_use]
    pub fn units_in_flight(&self, player: PlayerId) -> u64 {
        self.attacks
            .iter()
            .filter(|a| a.owner == player)
            .map(|a| u64::from(a.units))
            .sum()
    }
}
