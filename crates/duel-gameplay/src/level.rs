//! Static level geometry.
//!
//! A level is created once per load and never mutated during simulation.
//! Reloading replaces it wholesale.

use duel_common::LevelError;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::GroundProbe;
use crate::geometry::AABB;

/// Default gravity, in units per tick squared.
pub const DEFAULT_GRAVITY: f32 = 0.5;

/// An ordered set of platforms plus the world constants that act on bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    platforms: Vec<AABB>,
    gravity: f32,
    probe: GroundProbe,
}

impl Level {
    /// Creates a level, rejecting degenerate platforms.
    pub fn new(platforms: Vec<AABB>, gravity: f32, probe: GroundProbe) -> Result<Self, LevelError> {
        if !gravity.is_finite() {
            return Err(LevelError::InvalidGravity(gravity));
        }
        if !(probe.depth.is_finite() && probe.depth > 0.0) {
            return Err(LevelError::InvalidGroundThreshold(probe.depth));
        }
        if let Some((index, platform)) = platforms.iter().enumerate().find(|(_, p)| !p.is_valid()) {
            return Err(LevelError::DegeneratePlatform {
                index,
                width: platform.width(),
                height: platform.height(),
            });
        }

        Ok(Self {
            platforms,
            gravity,
            probe,
        })
    }

    /// Platforms in resolution order.
    #[must_use]
    pub fn platforms(&self) -> &[AABB] {
        &self.platforms
    }

    /// Gravity added to airborne vertical velocity each tick.
    #[must_use]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Ground contact probe.
    #[must_use]
    pub fn probe(&self) -> GroundProbe {
        self.probe
    }

    /// How far below a body's feet ground contact is detected.
    #[must_use]
    pub fn ground_threshold(&self) -> f32 {
        self.probe.depth
    }
}

/// Hard-coded level layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelPreset {
    /// Two-player arena: a floor and three ledges
    #[default]
    DuelArena,
    /// Wide scrolling course with ledges
    TrainingCourse,
    /// Boss lair: a floor and two ledges under heavier gravity
    BossLair,
}

impl LevelPreset {
    /// Builds the level for a viewport of the given size.
    pub fn build(self, viewport: Vec2) -> Result<Level, LevelError> {
        let (w, h) = (viewport.x, viewport.y);
        let (platforms, gravity) = match self {
            Self::DuelArena => (
                vec![
                    AABB::from_xywh(0.0, h - 50.0, w, 50.0),
                    AABB::from_xywh(200.0, 400.0, 150.0, 25.0),
                    AABB::from_xywh(500.0, 350.0, 150.0, 25.0),
                    AABB::from_xywh(700.0, 400.0, 150.0, 25.0),
                ],
                DEFAULT_GRAVITY,
            ),
            Self::TrainingCourse => (
                vec![
                    AABB::from_xywh(0.0, h - 100.0, w * 3.0, 100.0),
                    AABB::from_xywh(300.0, 400.0, 200.0, 20.0),
                    AABB::from_xywh(600.0, 300.0, 150.0, 20.0),
                    AABB::from_xywh(900.0, 400.0, 200.0, 20.0),
                    AABB::from_xywh(1200.0, 350.0, 100.0, 20.0),
                    AABB::from_xywh(1500.0, 450.0, 300.0, 20.0),
                ],
                DEFAULT_GRAVITY,
            ),
            Self::BossLair => (
                vec![
                    AABB::from_xywh(0.0, 550.0, 800.0, 50.0),
                    AABB::from_xywh(100.0, 400.0, 200.0, 20.0),
                    AABB::from_xywh(500.0, 350.0, 150.0, 20.0),
                ],
                0.8,
            ),
        };
        Level::new(platforms, gravity, GroundProbe::default())
    }

    /// Spawn points for player-controlled entities.
    #[must_use]
    pub fn player_spawns(self) -> Vec<Vec2> {
        match self {
            Self::DuelArena => vec![Vec2::new(300.0, 300.0), Vec2::new(700.0, 300.0)],
            Self::TrainingCourse | Self::BossLair => vec![Vec2::new(100.0, 300.0)],
        }
    }

    /// Spawn points for bosses.
    #[must_use]
    pub fn boss_spawns(self) -> Vec<Vec2> {
        match self {
            Self::BossLair => vec![Vec2::new(500.0, 300.0), Vec2::new(650.0, 200.0)],
            Self::DuelArena | Self::TrainingCourse => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_rejects_degenerate_platform() {
        let platforms = vec![
            AABB::from_xywh(0.0, 550.0, 800.0, 50.0),
            AABB::from_xywh(100.0, 400.0, 0.0, 20.0),
        ];
        let err = Level::new(platforms, DEFAULT_GRAVITY, GroundProbe::default());
        assert_eq!(
            err,
            Err(LevelError::DegeneratePlatform {
                index: 1,
                width: 0.0,
                height: 20.0
            })
        );
    }

    #[test]
    fn test_level_rejects_bad_constants() {
        assert_eq!(
            Level::new(Vec::new(), f32::INFINITY, GroundProbe::default()),
            Err(LevelError::InvalidGravity(f32::INFINITY))
        );
        let probe = GroundProbe {
            inset: 8.0,
            depth: 0.0,
        };
        assert_eq!(
            Level::new(Vec::new(), DEFAULT_GRAVITY, probe),
            Err(LevelError::InvalidGroundThreshold(0.0))
        );
    }

    #[test]
    fn test_duel_arena_floor_spans_viewport() {
        let level = LevelPreset::DuelArena
            .build(Vec2::new(1000.0, 600.0))
            .expect("preset is valid");
        assert_eq!(level.platforms().len(), 4);
        assert_eq!(level.platforms()[0], AABB::from_xywh(0.0, 550.0, 1000.0, 50.0));
        assert_eq!(level.gravity(), DEFAULT_GRAVITY);
        assert_eq!(level.ground_threshold(), 5.0);
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in [
            LevelPreset::DuelArena,
            LevelPreset::TrainingCourse,
            LevelPreset::BossLair,
        ] {
            assert!(preset.build(Vec2::new(800.0, 600.0)).is_ok());
            assert!(!preset.player_spawns().is_empty());
        }
        assert_eq!(LevelPreset::BossLair.boss_spawns().len(), 2);
        assert!(LevelPreset::DuelArena.boss_spawns().is_empty());
    }

    #[test]
    fn test_boss_lair_gravity() {
        let level = LevelPreset::BossLair
            .build(Vec2::new(800.0, 600.0))
            .expect("preset is valid");
        assert_eq!(level.gravity(), 0.8);
    }
}
