//! Error types for Duel.
//!
//! Gameplay denials (attacking while on cooldown, jumping in mid-air) are not
//! errors and never surface here. These types cover construction-time faults
//! and driver misuse only.

use thiserror::Error;

use crate::ids::EntityId;

/// Top-level error type for Duel operations.
#[derive(Debug, Error)]
pub enum DuelError {
    /// Level construction errors
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Arena driver errors
    #[error("Arena error: {0}")]
    Arena(#[from] ArenaError),
}

/// Level construction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    /// A platform has a non-positive or non-finite extent
    #[error("Platform {index} is degenerate ({width}x{height})")]
    DegeneratePlatform {
        /// Position of the platform in the level list
        index: usize,
        /// Platform width
        width: f32,
        /// Platform height
        height: f32,
    },

    /// Gravity must be a finite number
    #[error("Gravity must be finite, got {0}")]
    InvalidGravity(f32),

    /// The ground probe must reach below the body
    #[error("Ground threshold must be positive, got {0}")]
    InvalidGroundThreshold(f32),
}

/// Errors raised by the arena driver API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// No entity with this ID lives in the arena
    #[error("Unknown entity {0}")]
    UnknownEntity(EntityId),
}

/// Result type alias for Duel operations.
pub type DuelResult<T> = Result<T, DuelError>;
