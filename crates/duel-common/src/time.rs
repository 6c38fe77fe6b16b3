//! Time primitives shared by the simulation and its driver.
//!
//! The simulation runs two timing models side by side:
//! - cooldowns are counted in fixed ticks (`TICK_RATE` per second)
//! - action envelopes (attack swings, respawn) are measured against a
//!   monotonic millisecond clock
//!
//! Both models assume the fixed tick rate. Driving the simulation at any
//! other rate makes tick-based cooldowns drift against wall-clock envelopes.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Simulation ticks per second.
pub const TICK_RATE: u32 = 60;

/// Monotonic timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Millis(u64);

impl Millis {
    /// The zero timestamp.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from raw milliseconds.
    #[must_use]
    pub const fn new(ms: u64) -> Self {
        Self(ms)
    }

    /// Returns the raw millisecond value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    #[must_use]
    pub const fn since(self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }

    /// Returns this timestamp shifted forward.
    #[must_use]
    pub const fn after(self, delta: Self) -> Self {
        Self(self.0.saturating_add(delta.0))
    }

    /// Returns the value in seconds.
    #[must_use]
    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

/// A duration tagged with the timing model it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimDuration {
    /// A number of fixed simulation ticks.
    Ticks(u32),
    /// Real time in seconds, measured against the clock.
    Seconds(f32),
}

impl SimDuration {
    /// Converts to whole ticks at `TICK_RATE`.
    #[must_use]
    pub fn as_ticks(self) -> u32 {
        match self {
            Self::Ticks(ticks) => ticks,
            Self::Seconds(secs) => (secs.max(0.0) * TICK_RATE as f32).round() as u32,
        }
    }

    /// Converts to seconds.
    #[must_use]
    pub fn as_secs_f32(self) -> f32 {
        match self {
            Self::Ticks(ticks) => ticks as f32 / TICK_RATE as f32,
            Self::Seconds(secs) => secs.max(0.0),
        }
    }

    /// Converts to milliseconds.
    #[must_use]
    pub fn as_millis(self) -> Millis {
        match self {
            Self::Ticks(ticks) => {
                let rate = u64::from(TICK_RATE);
                Millis((u64::from(ticks) * 1000 + rate / 2) / rate)
            },
            Self::Seconds(secs) => Millis((secs.max(0.0) * 1000.0).round() as u64),
        }
    }
}

/// Monotonic timestamp source.
pub trait Clock {
    /// Returns the current timestamp.
    fn now(&self) -> Millis;
}

/// Clock advanced explicitly by its owner.
///
/// Used by fixed-step drivers and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Millis,
}

impl ManualClock {
    /// Creates a clock at the given timestamp.
    #[must_use]
    pub const fn starting_at(now: Millis) -> Self {
        Self { now }
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, delta: Millis) {
        self.now = self.now.after(delta);
    }

    /// Moves the clock forward by a duration.
    pub fn advance_by(&mut self, duration: SimDuration) {
        self.advance(duration.as_millis());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now
    }
}

/// Wall clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose zero is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Millis(u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX))
    }
}
