//! Collision resolution against static platforms.
//!
//! Two passes run per platform, in the platform's list order:
//! - penetration: push the body out along the axis of least overlap
//! - ground probe: a thin strip under the body decides whether it rests on
//!   the platform, independent of this tick's penetration axis
//!
//! Overlapping platforms that disagree on the push direction are settled by
//! list order alone.

use serde::{Deserialize, Serialize};

use crate::geometry::{Side, AABB};
use crate::physics::Body;

/// Shape of the ground contact probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundProbe {
    /// Horizontal inset from each side of the body
    pub inset: f32,
    /// How far below the body the probe reaches
    pub depth: f32,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self {
            inset: 8.0,
            depth: 5.0,
        }
    }
}

impl GroundProbe {
    /// Probe rectangle for a body.
    #[must_use]
    pub fn rect(&self, body: &Body) -> AABB {
        let rect = body.rect();
        let inset = self.inset.min(rect.width() / 2.0);
        AABB::new(
            rect.min_x + inset,
            rect.max_y,
            rect.max_x - inset,
            rect.max_y + self.depth,
        )
    }
}

/// Outcome of one collision pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Whether the body ended the pass standing on a platform
    pub grounded: bool,
    /// Penetration corrections applied, as (platform index, side)
    pub corrections: Vec<(usize, Side)>,
}

/// Pushes a body out of one platform along the axis of least penetration.
///
/// The correction only applies when the body is moving into that side:
/// landing needs `vy >= 0`, a head bump needs `vy < 0`, and side pushes need
/// `vx` pointing into the platform. The velocity component along the
/// corrected axis is zeroed. Returns the side that was corrected, if any.
pub fn resolve_penetration(body: &mut Body, platform: &AABB) -> Option<Side> {
    let rect = body.rect();
    if !rect.overlaps(platform) {
        return None;
    }

    let (side, _depth) = rect.penetration(platform).min_side();
    let applied = match side {
        Side::Top if body.velocity.y >= 0.0 => {
            body.set_bottom(platform.min_y);
            body.velocity.y = 0.0;
            true
        },
        Side::Bottom if body.velocity.y < 0.0 => {
            body.set_top(platform.max_y);
            body.velocity.y = 0.0;
            true
        },
        Side::Left if body.velocity.x > 0.0 => {
            body.set_right(platform.min_x);
            body.velocity.x = 0.0;
            true
        },
        Side::Right if body.velocity.x < 0.0 => {
            body.set_left(platform.max_x);
            body.velocity.x = 0.0;
            true
        },
        _ => false,
    };

    applied.then_some(side)
}

/// Resolves a body against every platform and recomputes ground contact.
///
/// Ground contact is never carried over from the previous tick.
pub fn resolve_platforms(body: &mut Body, platforms: &[AABB], probe: GroundProbe) -> CollisionReport {
    let mut report = CollisionReport::default();
    body.grounded = false;

    for (index, platform) in platforms.iter().enumerate() {
        if let Some(side) = resolve_penetration(body, platform) {
            if side == Side::Top {
                report.grounded = true;
            }
            report.corrections.push((index, side));
        }

        // A platform whose top sits well above the feet is a wall, not a floor.
        let reachable = platform.min_y >= body.rect().max_y - probe.depth;
        if reachable && body.velocity.y >= 0.0 && probe.rect(body).overlaps(platform) {
            body.set_bottom(platform.min_y);
            body.velocity.y = 0.0;
            report.grounded = true;
        }
    }

    body.grounded = report.grounded;
    report
}
