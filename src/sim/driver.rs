//! Real-time driving of a simulation from a [`Clock`].

use std::time::Duration;

use crate::sim::clock::Clock;
use crate::sim::simulation::{Simulation, TickReport};

/// Feeds wall-clock time into a [`Simulation`] in whole milliseconds.
///
/// Sub-millisecond remainders carry over to the next pump, so no time is
/// lost at high frame rates.
#[derive(Debug)]
pub struct Driver<C: Clock> {
    simulation: Simulation,
    clock: C,
    consumed: Duration,
    paused: bool,
}

impl<C: Clock> Driver<C> {
    /// Drive `simulation` from `clock`, starting at the clock's current time.
    #[must_use]
    pub fn new(simulation: Simulation, clock: C) -> Self {
        let consumed = clock.elapsed();
        Self {
            simulation,
            clock,
            consumed,
            paused: false,
        }
    }

    /// Advance the simulation by the wall time since the last pump.
    ///
    /// While paused, elapsed wall time is discarded.
    pub fn pump(&mut self) -> TickReport {
        let now = self.clock.elapsed();
        let delta = now.saturating_sub(self.consumed);
        let whole_ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);

        if self.paused {
            self.consumed = now;
            return TickReport::default();
        }

        self.consumed = self.consumed.saturating_add(Duration::from_millis(whole_ms));
        self.simulation.tick_ms(whole_ms)
    }

    /// Pause or resume. Time spent paused never reaches the simulation.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            self.consumed = self.clock.elapsed();
        }
        self.paused = paused;
    }

    /// Whether the driver is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// The driven simulation.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Mutable access for commands between pumps.
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Replace the simulation, keeping the clock.
    pub fn replace(&mut self, simulation: Simulation) {
        self.simulation = simulation;
        self.consumed = self.clock.elapsed();
    }

    /// The clock, for tests that move a [`ManualClock`](crate::sim::ManualClock).
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
