//! Body integration under gravity.
//!
//! Integration runs before collision resolution each tick so the resolver can
//! correct the displacement that was just applied.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::AABB;

/// Kinematic state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in world space
    pub position: Vec2,
    /// Displacement per tick
    pub velocity: Vec2,
    /// Fixed body extent
    pub size: Vec2,
    /// Ground contact from the last collision pass
    pub grounded: bool,
}

impl Body {
    /// Creates a resting body at `position`.
    #[must_use]
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            grounded: false,
        }
    }

    /// Body rectangle derived from position and size.
    #[must_use]
    pub fn rect(&self) -> AABB {
        AABB::at(self.position, self.size)
    }

    /// Center of the body rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Moves the body so its bottom edge sits at `y`.
    pub fn set_bottom(&mut self, y: f32) {
        self.position.y = y - self.size.y;
    }

    /// Moves the body so its top edge sits at `y`.
    pub fn set_top(&mut self, y: f32) {
        self.position.y = y;
    }

    /// Moves the body so its right edge sits at `x`.
    pub fn set_right(&mut self, x: f32) {
        self.position.x = x - self.size.x;
    }

    /// Moves the body so its left edge sits at `x`.
    pub fn set_left(&mut self, x: f32) {
        self.position.x = x;
    }
}

/// Per-tick multiplicative damping applied during integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    /// Factor applied to horizontal velocity
    pub horizontal: f32,
    /// Factor applied to vertical velocity
    pub vertical: f32,
}

impl Drag {
    /// No damping.
    pub const NONE: Self = Self {
        horizontal: 1.0,
        vertical: 1.0,
    };

    /// Combines two drag factors.
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self {
            horizontal: self.horizontal * other.horizontal,
            vertical: self.vertical * other.vertical,
        }
    }
}

impl Default for Drag {
    fn default() -> Self {
        Self::NONE
    }
}

/// Advances a body by one tick.
///
/// Gravity accumulates only while airborne and there is no terminal velocity.
pub fn integrate(body: &mut Body, gravity: f32, drag: Drag) {
    if !body.grounded {
        body.velocity.y += gravity;
    }

    body.velocity.x *= drag.horizontal;
    body.velocity.y *= drag.vertical;

    body.position += body.velocity;
}
