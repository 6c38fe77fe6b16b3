//! Animation state tracks.
//!
//! A track is a `(state, cursor)` pair. The cursor is a continuous frame
//! position moved by the state's [`Clip`]; the drawable frame is its floor.
//! Frame data itself stays with the [`AnimationProvider`], the core only
//! needs frame counts.

use duel_common::TICK_RATE;
use serde::{Deserialize, Serialize};

use crate::action::ActionState;
use crate::moveset::EntityKind;

/// How a clip's cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPolicy {
    /// Advance per tick and wrap to the first frame
    Looping,
    /// Advance per tick and stop on the last frame
    OneShot,
    /// Follow the progress of a real-time envelope
    TimeDriven,
    /// Stay on the last frame
    Held,
}

/// Playback parameters of one state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Number of frames the provider has for the state
    pub frame_count: usize,
    /// Playback rate in frames per second
    pub fps: f32,
    /// Cursor policy
    pub policy: PlaybackPolicy,
}

impl Clip {
    /// Creates a clip.
    #[must_use]
    pub const fn new(frame_count: usize, fps: f32, policy: PlaybackPolicy) -> Self {
        Self {
            frame_count,
            fps,
            policy,
        }
    }

    /// Cursor advance per tick.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.fps / TICK_RATE as f32
    }

    /// Index of the last frame.
    #[must_use]
    pub fn last_frame(&self) -> f32 {
        self.frame_count.saturating_sub(1) as f32
    }

    /// Default rate and policy of a state.
    #[must_use]
    pub fn for_state(state: ActionState, frame_count: usize) -> Self {
        let (fps, policy) = match state {
            ActionState::Idle => (8.0, PlaybackPolicy::Looping),
            ActionState::Walk => (12.0, PlaybackPolicy::Looping),
            ActionState::Jump => (10.0, PlaybackPolicy::OneShot),
            ActionState::Attack => (10.0, PlaybackPolicy::TimeDriven),
            ActionState::HeavyAttack => (8.0, PlaybackPolicy::TimeDriven),
            ActionState::Block => (1.0, PlaybackPolicy::Held),
            ActionState::Dodge => (12.0, PlaybackPolicy::OneShot),
            ActionState::Hurt => (8.0, PlaybackPolicy::OneShot),
            ActionState::Death => (6.0, PlaybackPolicy::OneShot),
            ActionState::Respawn => (10.0, PlaybackPolicy::TimeDriven),
        };
        Self::new(frame_count, fps, policy)
    }
}

/// Frame counts used when no art is loaded.
pub const PLACEHOLDER_FRAME_COUNTS: [(ActionState, usize); ActionState::COUNT] = [
    (ActionState::Idle, 4),
    (ActionState::Walk, 8),
    (ActionState::Jump, 9),
    (ActionState::Attack, 7),
    (ActionState::HeavyAttack, 7),
    (ActionState::Block, 1),
    (ActionState::Dodge, 4),
    (ActionState::Hurt, 3),
    (ActionState::Death, 5),
    (ActionState::Respawn, 6),
];

/// One clip per action state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipTable {
    clips: [Clip; ActionState::COUNT],
}

impl Default for ClipTable {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl ClipTable {
    /// Table sized for the placeholder frame counts.
    #[must_use]
    pub fn placeholder() -> Self {
        let mut clips = [Clip::new(0, 1.0, PlaybackPolicy::Held); ActionState::COUNT];
        for (state, count) in PLACEHOLDER_FRAME_COUNTS {
            clips[state.index()] = Clip::for_state(state, count);
        }
        Self { clips }
    }

    /// Table sized to what a provider actually has for `kind`.
    #[must_use]
    pub fn from_provider<P: AnimationProvider + ?Sized>(provider: &P, kind: EntityKind) -> Self {
        let clips = ActionState::ALL.map(|state| Clip::for_state(state, provider.frames(kind, state).len()));
        Self { clips }
    }

    /// Clip of a state.
    #[must_use]
    pub fn get(&self, state: ActionState) -> &Clip {
        &self.clips[state.index()]
    }

    /// Replaces the clip of a state.
    pub fn set(&mut self, state: ActionState, clip: Clip) {
        self.clips[state.index()] = clip;
    }
}

/// Current animation state and frame cursor of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationTrack {
    state: ActionState,
    cursor: f32,
}

impl AnimationTrack {
    /// Creates a track at the start of `state`.
    #[must_use]
    pub fn new(state: ActionState) -> Self {
        Self { state, cursor: 0.0 }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Continuous frame position.
    #[must_use]
    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Switches state, rewinding the cursor if the state changed.
    ///
    /// Returns `true` on a change.
    pub fn set_state(&mut self, state: ActionState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.cursor = 0.0;
        true
    }

    /// Rewinds the cursor without changing state.
    pub fn reset(&mut self) {
        self.cursor = 0.0;
    }

    /// Moves the cursor one tick.
    ///
    /// `progress` is the elapsed fraction of the envelope driving a
    /// time-driven clip; other policies ignore it.
    pub fn advance(&mut self, clip: &Clip, progress: f32) {
        if clip.frame_count == 0 {
            self.cursor = 0.0;
            return;
        }

        let last = clip.last_frame();
        self.cursor = match clip.policy {
            PlaybackPolicy::Looping => {
                let next = self.cursor + clip.speed();
                if next >= clip.frame_count as f32 {
                    0.0
                } else {
                    next
                }
            },
            PlaybackPolicy::OneShot => (self.cursor + clip.speed()).min(last),
            PlaybackPolicy::TimeDriven => progress.clamp(0.0, 1.0) * last,
            PlaybackPolicy::Held => last,
        };
    }

    /// Drawable frame for a state with `frame_count` frames.
    ///
    /// `None` when the state has no frames.
    #[must_use]
    pub fn frame_index(&self, frame_count: usize) -> Option<usize> {
        if frame_count == 0 {
            return None;
        }
        Some((self.cursor.max(0.0).floor() as usize).min(frame_count - 1))
    }
}

/// Source of drawable frames.
///
/// An empty slice means the state has nothing to draw.
pub trait AnimationProvider {
    /// Opaque drawable handle.
    type Frame;

    /// Ordered frames for a kind in a state.
    fn frames(&self, kind: EntityKind, state: ActionState) -> &[Self::Frame];
}

/// Handle produced by [`PlaceholderAnimations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderFrame {
    /// State the frame belongs to
    pub state: ActionState,
    /// Position within the state's clip
    pub index: usize,
}

/// Provider with numbered stand-in frames, identical for every kind.
#[derive(Debug, Clone)]
pub struct PlaceholderAnimations {
    frames: Vec<Vec<PlaceholderFrame>>,
}

impl Default for PlaceholderAnimations {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderAnimations {
    /// Builds frames using [`PLACEHOLDER_FRAME_COUNTS`].
    #[must_use]
    pub fn new() -> Self {
        let mut frames = vec![Vec::new(); ActionState::COUNT];
        for (state, count) in PLACEHOLDER_FRAME_COUNTS {
            frames[state.index()] = (0..count).map(|index| PlaceholderFrame { state, index }).collect();
        }
        Self { frames }
    }

    /// Drops every frame of a state, as if its art failed to load.
    #[must_use]
    pub fn without(mut self, state: ActionState) -> Self {
        self.frames[state.index()].clear();
        self
    }
}

impl AnimationProvider for PlaceholderAnimations {
    type Frame = PlaceholderFrame;

    fn frames(&self, _kind: EntityKind, state: ActionState) -> &[PlaceholderFrame] {
        &self.frames[state.index()]
    }
}
