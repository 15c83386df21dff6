//! Simulation loop and time handling.

pub mod clock;
pub mod driver;
pub mod simulation;

pub use clock::{Clock, Interval, ManualClock, Schedule, ScheduledEffect, SystemClock};
pub use driver::Driver;
pub use simulation::{Simulation, TickReport};
