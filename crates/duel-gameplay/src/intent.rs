//! Per-tick control intents.
//!
//! An intent is what a controller (a human input mapping or an AI brain)
//! wants an entity to do this tick. Entities consume it at the start of the
//! tick; requests the entity cannot honor are dropped silently.

use serde::{Deserialize, Serialize};

/// Horizontal movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizontal {
    /// No movement
    #[default]
    Still,
    /// Walk left
    Left,
    /// Walk right
    Right,
}

impl Horizontal {
    /// Direction sign: -1, 0 or 1.
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Still => 0.0,
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Movement toward `target_x` from `from_x`.
    #[must_use]
    pub fn toward(from_x: f32, target_x: f32) -> Self {
        if target_x < from_x {
            Self::Left
        } else if target_x > from_x {
            Self::Right
        } else {
            Self::Still
        }
    }
}

/// Everything a controller can request in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    /// Walking direction
    pub movement: Horizontal,
    /// Jump this tick
    pub jump: bool,
    /// Start a light attack
    pub attack: bool,
    /// Start a heavy attack
    pub heavy_attack: bool,
    /// Guard is held; releasing it drops the guard
    pub block: bool,
    /// Dodge this tick
    pub dodge: bool,
}

impl Intent {
    /// An intent that requests nothing.
    pub const IDLE: Self = Self {
        movement: Horizontal::Still,
        jump: false,
        attack: false,
        heavy_attack: false,
        block: false,
        dodge: false,
    };

    /// Walk in a direction.
    #[must_use]
    pub fn walk(movement: Horizontal) -> Self {
        Self {
            movement,
            ..Self::IDLE
        }
    }

    /// Adds a jump.
    #[must_use]
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    /// Adds a light attack.
    #[must_use]
    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    /// Adds a heavy attack.
    #[must_use]
    pub fn with_heavy_attack(mut self) -> Self {
        self.heavy_attack = true;
        self
    }

    /// Holds the guard.
    #[must_use]
    pub fn with_block(mut self) -> Self {
        self.block = true;
        self
    }

    /// Adds a dodge.
    #[must_use]
    pub fn with_dodge(mut self) -> Self {
        self.dodge = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intent_is_idle() {
        assert_eq!(Intent::default(), Intent::IDLE);
    }

    #[test]
    fn test_builders() {
        let intent = Intent::walk(Horizontal::Left).with_jump().with_block();
        assert_eq!(intent.movement, Horizontal::Left);
        assert!(intent.jump);
        assert!(intent.block);
        assert!(!intent.attack);
    }

    #[test]
    fn test_toward() {
        assert_eq!(Horizontal::toward(10.0, 5.0), Horizontal::Left);
        assert_eq!(Horizontal::toward(10.0, 50.0), Horizontal::Right);
        assert_eq!(Horizontal::toward(10.0, 10.0), Horizontal::Still);
        assert_eq!(Horizontal::Left.sign(), -1.0);
    }
}
