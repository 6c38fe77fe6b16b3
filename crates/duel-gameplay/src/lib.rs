//! # Duel Gameplay
//!
//! The combat simulation core of Duel.
//!
//! This crate provides everything that happens inside a tick:
//! - Geometry and platform collision with a separate ground probe
//! - Gravity integration with per-action drag
//! - The action state machine (attacks, guard, dodge, stun, death, respawn)
//! - Animation tracks with looping, one-shot, time-driven and held clips
//! - Combat arbitration with guard mitigation and knockback
//! - Boss brains, follow camera, level presets and the arena driver
//!
//! Rendering, audio playback and input mapping stay outside: the core hands
//! out draw states and sound cues and accepts per-tick intents.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod action;
pub mod ai;
pub mod animation;
pub mod arbiter;
pub mod arena;
pub mod camera;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod intent;
pub mod level;
pub mod moveset;
pub mod physics;
pub mod sound;
pub mod timers;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::action::*;
    pub use crate::ai::*;
    pub use crate::animation::*;
    pub use crate::arbiter::*;
    pub use crate::arena::*;
    pub use crate::camera::*;
    pub use crate::collision::*;
    pub use crate::entity::*;
    pub use crate::geometry::*;
    pub use crate::intent::*;
    pub use crate::level::*;
    pub use crate::moveset::*;
    pub use crate::physics::*;
    pub use crate::sound::*;
    pub use crate::timers::*;
}

pub use prelude::*;
