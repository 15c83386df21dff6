//! Bot decision-making.
//!
//! Bots see the whole board and act through the same launch rules as
//! humans. Every launch is re-validated by the attack engine, so a policy may
//! propose moves that turn out to be no-ops.

use rand::{Rng, RngCore};
use tracing::trace;

use crate::config::{BotConfig, BotPolicyKind};
use crate::game::{GameState, PlayerId, TerritoryId};

/// A bot decision procedure, run once per bot tick for each living bot.
pub trait BotPolicy: std::fmt::Debug + Send {
    /// Decide and launch this tick's attacks for `player` at time `now`.
    ///
    /// Returns the number of attacks launched.
    fn act(
        &self,
        state: &mut GameState,
        player: PlayerId,
        now: u64,
        rng: &mut dyn RngCore,
    ) -> usize;
}

/// Build the policy selected in `config`.
#[must_use]
pub fn policy_for(config: &BotConfig) -> Box<dyn BotPolicy> {
    match config.policy {
        BotPolicyKind::Frontline => Box::new(FrontlinePolicy::new(*config)),
        BotPolicyKind::SingleChoice => Box::new(SingleChoicePolicy::new(*config)),
    }
}

/// Run `policy` for every living bot, in player order.
///
/// Returns the number of attacks launched.
pub fn run_bots(
    policy: &dyn BotPolicy,
    state: &mut GameState,
    now: u64,
    rng: &mut dyn RngCore,
) -> usize {
    if !state.is_active() {
        return 0;
    }

    let bots: Vec<PlayerId> = state
        .players
        .iter()
        .filter(|p| p.is_active_bot())
        .map(|p| p.id)
        .collect();

    let mut launched = 0;
    for player in bots {
        launched += policy.act(state, player, now, rng);
    }
    launched
}

/// Expansion attractiveness of attacking a garrison of `to_units` with `from_units`.
#[allow(clippy::cast_precision_loss)]
fn expansion_score(from_units: u32, to_units: u32) -> f64 {
    (f64::from(from_units) - f64::from(to_units)) / (f64::from(to_units) + 1.0)
}

/// Best non-owned neighbour of `from` to attack, with its score.
///
/// Candidates must trail the source by more than `margin` units. The first
/// neighbour (in index order) wins ties.
fn best_target(
    state: &GameState,
    player: PlayerId,
    from: TerritoryId,
    margin: u32,
) -> Option<(TerritoryId, f64)> {
    let source = state.territories.get(from)?;
    let mut best: Option<(TerritoryId, f64)> = None;

    for &to in source.connections() {
        let Some(target) = state.territories.get(to) else {
            continue;
        };
        if target.is_owned_by(player) {
            continue;
        }
        if u64::from(source.units) <= u64::from(target.units) + u64::from(margin) {
            continue;
        }

        let score = expansion_score(source.units, target.units);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((to, score));
        }
    }

    best
}

/// Owned territories whose neighbours are all owned, holding more than `min_units`,
/// strongest first.
fn backline(state: &GameState, player: PlayerId, min_units: u32) -> Vec<TerritoryId> {
    let mut ids: Vec<TerritoryId> = state
        .territories
        .owned_by(player)
        .filter(|&(id, t)| {
            t.units > min_units && !state.territories.has_foreign_neighbour(id, player)
        })
        .map(|(id, _)| id)
        .collect();
    ids.sort_by_key(|&id| std::cmp::Reverse(units_of(state, id)));
    ids
}

/// Owned territories with at least one foreign neighbour, weakest first.
fn frontline(state: &GameState, player: PlayerId) -> Vec<TerritoryId> {
    let mut ids: Vec<TerritoryId> = state
        .territories
        .owned_by(player)
        .filter(|&(id, _)| state.territories.has_foreign_neighbour(id, player))
        .map(|(id, _)| id)
        .collect();
    ids.sort_by_key(|&id| units_of(state, id));
    ids
}

fn units_of(state: &GameState, id: TerritoryId) -> u32 {
    state.territories.get(id).map_or(0, |t| t.units)
}

fn roll(rng: &mut dyn RngCore, chance: f64) -> bool {
    rng.random::<f64>() < chance
}

fn launch(
    state: &mut GameState,
    player: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    now: u64,
) -> usize {
    let launched = state.launch_attack(from, to, now).is_some();
    if launched {
        trace!(player, from, to, "bot attack");
    }
    usize::from(launched)
}

/// Attack from every strong front, then maybe move a reserve forward.
///
/// Expansion looks at each owned territory with enough units and attacks its
/// most favourable foreign neighbour with a fixed chance, so a bot can push on
/// several fronts in one tick. Afterwards the strongest backline territory may
/// reinforce the weakest frontline territory when it is clearly stronger.
#[derive(Debug, Clone, Copy)]
pub struct FrontlinePolicy {
    config: BotConfig,
}

impl FrontlinePolicy {
    /// Create the policy with the given thresholds.
    #[must_use]
    pub const fn new(config: BotConfig) -> Self {
        Self { config }
    }

    fn expand(
        &self,
        state: &mut GameState,
        player: PlayerId,
        now: u64,
        rng: &mut dyn RngCore,
    ) -> usize {
        let owned: Vec<TerritoryId> = state
            .territories
            .owned_by(player)
            .map(|(id, _)| id)
            .collect();
        let mut launched = 0;

        for from in owned {
            if units_of(state, from) < self.config.expansion_min_units {
                continue;
            }
            let Some((to, _)) =
                best_target(state, player, from, self.config.expansion_margin)
            else {
                continue;
            };
            if roll(rng, self.config.expansion_chance) {
                launched += launch(state, player, from, to, now);
            }
        }

        launched
    }

    fn reinforce(
        &self,
        state: &mut GameState,
        player: PlayerId,
        now: u64,
        rng: &mut dyn RngCore,
    ) -> usize {
        let reserves = backline(state, player, self.config.backline_min_units);
        let Some(&reinforcer) = reserves.first() else {
            return 0;
        };
        let Some(&target) = frontline(state, player).first() else {
            return 0;
        };

        let gap = u64::from(self.config.reinforce_margin);
        if u64::from(units_of(state, reinforcer)) > u64::from(units_of(state, target)) + gap
            && roll(rng, self.config.reinforce_chance)
        {
            return launch(state, player, reinforcer, target, now);
        }
        0
    }
}

impl BotPolicy for FrontlinePolicy {
    fn act(
        &self,
        state: &mut GameState,
        player: PlayerId,
        now: u64,
        rng: &mut dyn RngCore,
    ) -> usize {
        if state.territories.count_owned(player) == 0 {
            return 0;
        }
        self.expand(state, player, now, rng) + self.reinforce(state, player, now, rng)
    }
}

/// One weighted roll per tick picks a single move.
///
/// Below `single_choice_attack` the globally best expansion move is played;
/// below `single_choice_reinforce` the weakest frontline territory is topped
/// up from its strongest owned neighbour; otherwise the strongest backline
/// territory is consolidated into the weakest frontline territory.
#[derive(Debug, Clone, Copy)]
pub struct SingleChoicePolicy {
    config: BotConfig,
}

impl SingleChoicePolicy {
    /// Create the policy with the given thresholds.
    #[must_use]
    pub const fn new(config: BotConfig) -> Self {
        Self { config }
    }

    fn best_attack(
        &self,
        state: &GameState,
        player: PlayerId,
    ) -> Option<(TerritoryId, TerritoryId)> {
        let mut best: Option<(TerritoryId, TerritoryId, f64)> = None;
        for (from, territory) in state.territories.owned_by(player) {
            if territory.units < self.config.expansion_min_units {
                continue;
            }
            if let Some((to, score)) =
                best_target(state, player, from, self.config.expansion_margin)
                && best.is_none_or(|(_, _, s)| score > s)
            {
                best = Some((from, to, score));
            }
        }
        best.map(|(from, to, _)| (from, to))
    }

    fn weakest_reinforcement(
        state: &GameState,
        player: PlayerId,
    ) -> Option<(TerritoryId, TerritoryId)> {
        let target = *frontline(state, player).first()?;
        let target_units = units_of(state, target);

        let mut helper: Option<TerritoryId> = None;
        for &n in state.territories.get(target)?.connections() {
            let Some(t) = state.territories.get(n) else {
                continue;
            };
            if t.is_owned_by(player)
                && t.units > target_units
                && t.units > 1
                && helper.is_none_or(|h| t.units > units_of(state, h))
            {
                helper = Some(n);
            }
        }
        helper.map(|from| (from, target))
    }

    fn consolidation(state: &GameState, player: PlayerId) -> Option<(TerritoryId, TerritoryId)> {
        let from = *backline(state, player, 1).first()?;
        let to = *frontline(state, player).first()?;
        Some((from, to))
    }
}

impl BotPolicy for SingleChoicePolicy {
    fn act(
        &self,
        state: &mut GameState,
        player: PlayerId,
        now: u64,
        rng: &mut dyn RngCore,
    ) -> usize {
        if state.territories.count_owned(player) == 0 {
            return 0;
        }

        let r = rng.random::<f64>();
        let choice = if r < self.config.single_choice_attack {
            self.best_attack(state, player)
        } else if r < self.config.single_choice_reinforce {
            Self::weakest_reinforcement(state, player)
        } else {
            Self::consolidation(state, player)
        };

        choice.map_or(0, |(from, to)| launch(state, player, from, to, now))
    }
}
