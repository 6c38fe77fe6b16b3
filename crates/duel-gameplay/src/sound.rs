//! Sound cue requests.
//!
//! The simulation never plays audio. It queues [`SoundId`]s and the driver
//! drains the queue into a [`SoundDispatcher`] once per tick.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Sound cues the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    /// A light attack connected
    Attack,
    /// A heavy attack connected
    HeavyAttack,
    /// A hit was taken on the guard
    Block,
    /// Jump started
    Jump,
    /// Dodge started
    Dodge,
    /// A defender was hit
    Hit,
}

impl SoundId {
    /// All cues.
    pub const ALL: [Self; 6] = [
        Self::Attack,
        Self::HeavyAttack,
        Self::Block,
        Self::Jump,
        Self::Dodge,
        Self::Hit,
    ];

    /// Asset-facing name of the cue.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::HeavyAttack => "heavy_attack",
            Self::Block => "block",
            Self::Jump => "jump",
            Self::Dodge => "dodge",
            Self::Hit => "hit",
        }
    }
}

/// Fire-and-forget sink for sound cues.
///
/// Implementations swallow their own playback failures.
pub trait SoundDispatcher {
    /// Plays a cue.
    fn play(&mut self, sound: SoundId);
}

impl SoundDispatcher for Vec<SoundId> {
    fn play(&mut self, sound: SoundId) {
        self.push(sound);
    }
}

/// FIFO of cues emitted during a tick.
#[derive(Debug, Clone, Default)]
pub struct SoundQueue {
    pending: VecDeque<SoundId>,
}

impl SoundQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a cue.
    pub fn push(&mut self, sound: SoundId) {
        self.pending.push_back(sound);
    }

    /// Queues several cues in order.
    pub fn extend(&mut self, sounds: impl IntoIterator<Item = SoundId>) {
        self.pending.extend(sounds);
    }

    /// Number of queued cues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every queued cue in emission order.
    pub fn drain(&mut self) -> impl Iterator<Item = SoundId> + '_ {
        self.pending.drain(..)
    }

    /// Sends every queued cue to a dispatcher. Returns how many were sent.
    pub fn dispatch_to(&mut self, dispatcher: &mut impl SoundDispatcher) -> usize {
        let count = self.pending.len();
        for sound in self.pending.drain(..) {
            dispatcher.play(sound);
        }
        count
    }
}
