//! # Duel Common
//!
//! Common types, utilities, and shared abstractions for Duel.
//!
//! This crate provides foundational types used by the simulation core and the
//! headless engine:
//! - ID types (EntityId)
//! - Time primitives (millisecond timestamps, tagged durations, clocks)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod time;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::time::*;
}

pub use prelude::*;
