//! Axis-aligned rectangles in screen space.
//!
//! Coordinates follow the screen convention: `x` grows to the right and `y`
//! grows downward, so `min_y` is the top edge and `max_y` the bottom edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Left edge
    pub min_x: f32,
    /// Top edge
    pub min_y: f32,
    /// Right edge
    pub max_x: f32,
    /// Bottom edge
    pub max_y: f32,
}

impl AABB {
    /// Creates a new AABB from its edges.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates an AABB from a top-left corner and a size.
    #[must_use]
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Creates an AABB whose top-left corner sits at `position`.
    #[must_use]
    pub fn at(position: Vec2, size: Vec2) -> Self {
        Self::from_xywh(position.x, position.y, size.x, size.y)
    }

    /// Top-left corner.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_y)
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the AABB.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the AABB.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the extent as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Checks if this AABB overlaps with another. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &AABB) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Returns the AABB translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Returns `true` when both extents are positive and finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    /// Penetration depth through each side of `obstacle`.
    ///
    /// Only meaningful when the boxes overlap.
    #[must_use]
    pub fn penetration(&self, obstacle: &AABB) -> Penetration {
        Penetration {
            top: self.max_y - obstacle.min_y,
            bottom: obstacle.max_y - self.min_y,
            left: self.max_x - obstacle.min_x,
            right: obstacle.max_x - self.min_x,
        }
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Side of an obstacle a moving box entered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Landed on the top surface
    Top,
    /// Hit the underside
    Bottom,
    /// Pushed into the left face
    Left,
    /// Pushed into the right face
    Right,
}

/// Overlap depths of a moving box through each side of an obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Mover bottom below obstacle top
    pub top: f32,
    /// Obstacle bottom below mover top
    pub bottom: f32,
    /// Mover right past obstacle left
    pub left: f32,
    /// Obstacle right past mover left
    pub right: f32,
}

impl Penetration {
    /// Side with the smallest penetration.
    ///
    /// Ties keep the first side in `top, bottom, left, right` order.
    #[must_use]
    pub fn min_side(&self) -> (Side, f32) {
        [
            (Side::Bottom, self.bottom),
            (Side::Left, self.left),
            (Side::Right, self.right),
        ]
        .into_iter()
        .fold((Side::Top, self.top), |best, candidate| {
            if candidate.1 < best.1 {
                candidate
            } else {
                best
            }
        })
    }
}
