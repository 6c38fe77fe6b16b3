//! Fixed-step timing.
//!
//! The simulation advances in whole ticks at `TICK_RATE`. Timestamps are
//! derived from the tick index rather than accumulated, so rounding never
//! builds up over a long match.

use std::time::Duration;

use duel_common::{Clock, Millis, SystemClock, TICK_RATE};

/// Tick counter that doubles as the simulation clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    tick: u64,
}

impl FixedStep {
    /// Creates a stepper at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next tick to run.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Moves to the next tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Timestamp of tick `tick`.
    #[must_use]
    pub fn millis_at(tick: u64) -> Millis {
        Millis::new(tick * 1000 / u64::from(TICK_RATE))
    }
}

impl Clock for FixedStep {
    fn now(&self) -> Millis {
        Self::millis_at(self.tick)
    }
}

/// Keeps a fixed stepper from running ahead of the wall clock.
#[derive(Debug)]
pub struct Pacer {
    wall: SystemClock,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer {
    /// Starts pacing from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wall: SystemClock::new(),
        }
    }

    /// How far the simulation is ahead of real time.
    #[must_use]
    pub fn lead(&self, sim: &impl Clock) -> Duration {
        Duration::from_millis(sim.now().since(self.wall.now()).raw())
    }

    /// Sleeps until the wall clock catches up with `sim`.
    pub fn wait_for(&self, sim: &impl Clock) {
        let lead = self.lead(sim);
        if !lead.is_zero() {
            std::thread::sleep(lead);
        }
    }
}
