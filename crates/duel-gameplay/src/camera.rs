//! Smoothed follow camera.
//!
//! The camera stores the world position of the viewport's top-left corner
//! and eases it toward a focus point a fixed fraction per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::AABB;

/// Default fraction of the remaining distance covered per tick.
pub const DEFAULT_SMOOTHING: f32 = 0.05;

/// 2D follow camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    offset: Vec2,
    viewport: Vec2,
    smoothing: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::new(1000.0, 600.0))
    }
}

impl Camera {
    /// Creates a camera at the world origin.
    #[must_use]
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
            smoothing: DEFAULT_SMOOTHING,
        }
    }

    /// Sets the smoothing factor, clamped to `(0, 1]`.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(f32::EPSILON, 1.0);
        self
    }

    /// World position of the viewport's top-left corner.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Offset that would center `focus` in the viewport.
    #[must_use]
    pub fn target_for(&self, focus: Vec2) -> Vec2 {
        focus - self.viewport * 0.5
    }

    /// Eases toward centering `focus`.
    pub fn follow(&mut self, focus: Vec2) {
        let target = self.target_for(focus);
        self.offset += (target - self.offset) * self.smoothing;
    }

    /// Centers `focus` immediately.
    pub fn snap_to(&mut self, focus: Vec2) {
        self.offset = self.target_for(focus);
    }

    /// Converts a world point to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    /// Converts a screen point to world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }

    /// World region inside the viewport.
    #[must_use]
    pub fn visible_bounds(&self) -> AABB {
        AABB::at(self.offset, self.viewport)
    }
}
