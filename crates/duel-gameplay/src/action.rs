//! Action conditions and the state they resolve to.
//!
//! An entity carries a fixed set of boolean conditions. Each tick they are
//! folded into exactly one [`ActionState`] using a total priority order:
//!
//! ```text
//! dead > respawning > stunned > attacking > blocking > dodging > airborne > moving > idle
//! ```

use duel_common::{Millis, SimDuration};
use serde::{Deserialize, Serialize};

use crate::timers::{Cooldown, Envelope};

/// Fraction of a swing at which its hitbox becomes active.
pub const HITBOX_OPENS_AT: f32 = 0.7;

/// Fraction of a swing at which its hitbox closes again.
pub const HITBOX_CLOSES_AT: f32 = 0.95;

/// The single state an entity presents to animation and combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    /// Standing still on the ground
    #[default]
    Idle,
    /// Moving horizontally on the ground
    Walk,
    /// Airborne
    Jump,
    /// Light attack swing
    Attack,
    /// Heavy attack swing
    HeavyAttack,
    /// Holding a guard
    Block,
    /// Dodge window
    Dodge,
    /// Stunned after taking damage
    Hurt,
    /// Dead, waiting for respawn or removal
    Death,
    /// Returning to play after death
    Respawn,
}

impl ActionState {
    /// Number of states.
    pub const COUNT: usize = 10;

    /// All states in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Idle,
        Self::Walk,
        Self::Jump,
        Self::Attack,
        Self::HeavyAttack,
        Self::Block,
        Self::Dodge,
        Self::Hurt,
        Self::Death,
        Self::Respawn,
    ];

    /// Dense index, matching the position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Asset-facing name of the state.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Jump => "jump",
            Self::Attack => "attack",
            Self::HeavyAttack => "heavy_attack",
            Self::Block => "block",
            Self::Dodge => "dodge",
            Self::Hurt => "hurt",
            Self::Death => "death",
            Self::Respawn => "respawn",
        }
    }
}

/// Boolean action conditions of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conditions {
    /// A swing is in progress
    pub attacking: bool,
    /// The swing in progress is heavy
    pub heavy_attacking: bool,
    /// Guard is held
    pub blocking: bool,
    /// Dodge window is open
    pub dodging: bool,
    /// Stunned after a hit
    pub stunned: bool,
    /// Health reached zero
    pub dead: bool,
    /// Respawn envelope is running
    pub respawning: bool,
}

impl Conditions {
    /// Dead or respawning: no input, physics or combat exposure.
    #[must_use]
    pub const fn is_out_of_play(&self) -> bool {
        self.dead || self.respawning
    }

    /// Stunned, dead or respawning.
    #[must_use]
    pub const fn is_incapacitated(&self) -> bool {
        self.stunned || self.is_out_of_play()
    }

    /// Resolves the conditions into a single state.
    #[must_use]
    pub fn resolve(&self, grounded: bool, moving: bool) -> ActionState {
        if self.dead {
            ActionState::Death
        } else if self.respawning {
            ActionState::Respawn
        } else if self.stunned {
            ActionState::Hurt
        } else if self.attacking {
            if self.heavy_attacking {
                ActionState::HeavyAttack
            } else {
                ActionState::Attack
            }
        } else if self.blocking {
            ActionState::Block
        } else if self.dodging {
            ActionState::Dodge
        } else if !grounded {
            ActionState::Jump
        } else if moving {
            ActionState::Walk
        } else {
            ActionState::Idle
        }
    }
}

/// Tick cooldowns of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    /// Light attack reuse
    pub attack: Cooldown,
    /// Heavy attack reuse
    pub heavy_attack: Cooldown,
    /// Dodge reuse
    pub dodge: Cooldown,
    /// Open dodge window
    pub dodge_window: Cooldown,
    /// Remaining stun
    pub stun: Cooldown,
}

/// Timers that elapsed during [`Cooldowns::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Elapsed {
    /// The stun ran out
    pub stun: bool,
    /// The dodge window closed
    pub dodge_window: bool,
}

impl Cooldowns {
    /// Counts every cooldown down by one tick.
    pub fn tick(&mut self) -> Elapsed {
        self.attack.tick();
        self.heavy_attack.tick();
        self.dodge.tick();
        Elapsed {
            stun: self.stun.tick(),
            dodge_window: self.dodge_window.tick(),
        }
    }

    /// Clears every cooldown.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Weight class of a swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwingKind {
    /// Light attack
    Light,
    /// Heavy attack
    Heavy,
}

/// Phase of a swing, derived from its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwingPhase {
    /// Before the hitbox opens
    Windup,
    /// Hitbox is live
    Active,
    /// After the hitbox closed
    Recovery,
    /// Declared duration elapsed
    Finished,
}

/// An attack in progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swing {
    /// Weight class
    pub kind: SwingKind,
    /// Damage dealt on an unmitigated hit
    pub damage: i32,
    /// Knockback force on an unmitigated hit
    pub knockback: f32,
    envelope: Envelope,
}

impl Swing {
    /// Starts a swing at `now`.
    #[must_use]
    pub fn new(kind: SwingKind, damage: i32, knockback: f32, now: Millis, duration: SimDuration) -> Self {
        Self {
            kind,
            damage,
            knockback,
            envelope: Envelope::new(now, duration),
        }
    }

    /// Fraction of the swing elapsed.
    #[must_use]
    pub fn progress(&self, now: Millis) -> f32 {
        self.envelope.progress(now)
    }

    /// Phase at `now`.
    #[must_use]
    pub fn phase(&self, now: Millis) -> SwingPhase {
        if self.envelope.is_complete(now) {
            return SwingPhase::Finished;
        }
        let progress = self.progress(now);
        if progress < HITBOX_OPENS_AT {
            SwingPhase::Windup
        } else if progress < HITBOX_CLOSES_AT {
            SwingPhase::Active
        } else {
            SwingPhase::Recovery
        }
    }

    /// Whether the swing can register a hit at `now`.
    #[must_use]
    pub fn is_active(&self, now: Millis) -> bool {
        self.phase(now) == SwingPhase::Active
    }
}
