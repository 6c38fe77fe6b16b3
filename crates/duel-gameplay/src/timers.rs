//! Tick cooldowns and wall-clock envelopes.
//!
//! Cooldowns count down once per tick and gate when an action may start
//! again. Envelopes measure the progress of an action that has a fixed
//! real-time length (a swing, a respawn) against clock timestamps.

use duel_common::{Millis, SimDuration};
use serde::{Deserialize, Serialize};

/// Tick-decremented counter, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    /// A cooldown that is already elapsed.
    pub const READY: Self = Self { remaining: 0 };

    /// Restarts the cooldown.
    pub fn start(&mut self, duration: SimDuration) {
        self.remaining = duration.as_ticks();
    }

    /// Counts down one tick. Returns `true` on the tick the cooldown elapses.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Ticks left before the cooldown elapses.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the cooldown has elapsed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// Clears the cooldown.
    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}

/// A fixed real-time span anchored at a start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    started: Millis,
    length: Millis,
}

impl Envelope {
    /// Starts an envelope at `now`.
    #[must_use]
    pub fn new(now: Millis, duration: SimDuration) -> Self {
        Self {
            started: now,
            length: duration.as_millis(),
        }
    }

    /// Start timestamp.
    #[must_use]
    pub const fn started(&self) -> Millis {
        self.started
    }

    /// Declared length.
    #[must_use]
    pub const fn length(&self) -> Millis {
        self.length
    }

    /// Time elapsed since the start.
    #[must_use]
    pub fn elapsed(&self, now: Millis) -> Millis {
        now.since(self.started)
    }

    /// Fraction of the envelope elapsed, in `[0, 1]`.
    ///
    /// A zero-length envelope is complete immediately.
    #[must_use]
    pub fn progress(&self, now: Millis) -> f32 {
        if self.length == Millis::ZERO {
            return 1.0;
        }
        (self.elapsed(now).raw() as f32 / self.length.raw() as f32).clamp(0.0, 1.0)
    }

    /// Whether the full length has elapsed.
    #[must_use]
    pub fn is_complete(&self, now: Millis) -> bool {
        self.elapsed(now) >= self.length
    }
}
