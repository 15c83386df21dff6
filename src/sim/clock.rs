//! Time sources and the periodic effect schedule.
//!
//! The simulation runs on virtual milliseconds. A [`Clock`] only tells a
//! frontend how much wall time passed; the [`Schedule`] decides which
//! periodic effects are due within a span of virtual time.

use std::time::{Duration, Instant};

use crate::config::TimingConfig;

/// Source of elapsed time since the clock started.
pub trait Clock {
    /// Time elapsed since the clock started.
    fn elapsed(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Start a clock now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// A clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.saturating_add(by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now
    }
}

/// A periodic effect that fires every `period_ms`, first at `period_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u64,
    next_due_ms: u64,
}

impl Interval {
    /// Create an interval. A zero period is treated as 1 ms.
    #[must_use]
    pub fn new(period_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: period_ms,
        }
    }

    /// Period in milliseconds.
    #[must_use]
    pub const fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Virtual time of the next firing.
    #[must_use]
    pub const fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Take the next firing if it is due at or before `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<u64> {
        if self.next_due_ms > until_ms {
            return None;
        }
        let due = self.next_due_ms;
        self.next_due_ms = self.next_due_ms.saturating_add(self.period_ms);
        Some(due)
    }
}

/// The periodic effects driven by the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduledEffect {
    /// Every owned territory below its cap gains a unit.
    Growth,
    /// Every living bot takes a turn.
    Bots,
}

/// Unit growth and bot turns on independent intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    growth: Interval,
    bots: Interval,
    cancelled: bool,
}

impl Schedule {
    /// Schedule both effects with the configured periods.
    #[must_use]
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            growth: Interval::new(timing.unit_interval_ms),
            bots: Interval::new(timing.bot_interval_ms),
            cancelled: false,
        }
    }

    /// Stop all future firings.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the schedule was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Take every firing due at or before `until_ms`, in chronological order.
    ///
    /// Missed periods are all returned. Growth comes before bots when both
    /// are due at the same time.
    pub fn due(&mut self, until_ms: u64) -> Vec<(u64, ScheduledEffect)> {
        if self.cancelled {
            return Vec::new();
        }

        let mut firings = Vec::new();
        while let Some(at) = self.growth.pop_due(until_ms) {
            firings.push((at, ScheduledEffect::Growth));
        }
        while let Some(at) = self.bots.pop_due(until_ms) {
            firings.push((at, ScheduledEffect::Bots));
        }
        firings.sort_unstable();
        firings
    }
}
