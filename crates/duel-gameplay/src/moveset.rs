//! Per-kind tuning and capabilities.
//!
//! An entity is generic; what it can do and how hard it hits comes from the
//! [`MoveSet`] it is built with.

use duel_common::SimDuration;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Broad category of an entity, used for asset lookup and match rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Player-style fighter
    #[default]
    Fighter,
    /// AI-driven boss
    Boss,
}

impl EntityKind {
    /// Display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Fighter => "Fighter",
            Self::Boss => "Boss",
        }
    }
}

/// Tuning of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackSpec {
    /// Damage on an unmitigated hit
    pub damage: i32,
    /// Reuse cooldown
    pub cooldown: SimDuration,
    /// Declared swing length
    pub duration: SimDuration,
    /// Horizontal knockback speed applied to the defender
    pub knockback: f32,
}

impl Default for AttackSpec {
    fn default() -> Self {
        Self::light()
    }
}

impl AttackSpec {
    /// Standard light attack.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            damage: 10,
            cooldown: SimDuration::Ticks(45),
            duration: SimDuration::Seconds(0.7),
            knockback: 5.0,
        }
    }

    /// Standard heavy attack.
    #[must_use]
    pub const fn heavy() -> Self {
        Self {
            damage: 20,
            cooldown: SimDuration::Ticks(60),
            duration: SimDuration::Seconds(1.0),
            knockback: 8.0,
        }
    }

    /// Sets the damage.
    #[must_use]
    pub const fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }
}

/// Tuning of the dodge move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DodgeSpec {
    /// Horizontal speed along facing when the dodge starts
    pub impulse: f32,
    /// Length of the dodge window
    pub window: SimDuration,
    /// Reuse cooldown
    pub cooldown: SimDuration,
    /// Per-tick vertical damping during the window
    pub vertical_damping: f32,
    /// Factor applied to horizontal speed when the window closes
    pub exit_factor: f32,
    /// Whether hits pass through the entity during the window
    pub evades_hits: bool,
}

impl Default for DodgeSpec {
    fn default() -> Self {
        Self {
            impulse: 15.0,
            window: SimDuration::Ticks(20),
            cooldown: SimDuration::Ticks(60),
            vertical_damping: 0.8,
            exit_factor: 0.5,
            evades_hits: false,
        }
    }
}

/// Whether and when an entity returns after death.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespawnPolicy {
    /// Stays dead
    Never,
    /// Respawns automatically once this long has passed since death
    After(SimDuration),
}

impl RespawnPolicy {
    /// Whether respawning is supported at all.
    #[must_use]
    pub fn can_respawn(self) -> bool {
        matches!(self, Self::After(_))
    }
}

/// Complete tuning of an entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveSet {
    /// Category for assets and match rules
    pub kind: EntityKind,
    /// Body extent
    pub size: Vec2,
    /// Health on spawn and respawn
    pub max_health: i32,
    /// Walking speed in units per tick
    pub speed: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_impulse: f32,
    /// Light attack
    pub attack: AttackSpec,
    /// Heavy attack, if the kind has one
    pub heavy_attack: Option<AttackSpec>,
    /// Dodge, if the kind has one
    pub dodge: Option<DodgeSpec>,
    /// Whether the kind can hold a guard
    pub can_block: bool,
    /// Fraction of damage taken through a guard
    pub block_factor: f32,
    /// Per-tick horizontal damping while guarding
    pub block_drag: f32,
    /// Whether walking input is ignored mid-swing
    pub roots_while_attacking: bool,
    /// Horizontal reach of the hitbox beyond the body edge
    pub reach: f32,
    /// Height of the hitbox band
    pub hitbox_height: f32,
    /// Offset of the band's center above the body's center. A lift of
    /// `(size.y - hitbox_height) / 2` aligns the band with the body's top.
    pub hitbox_lift: f32,
    /// Vertical velocity applied by knockback (negative is up)
    pub knockback_lift: f32,
    /// Stun applied when damaged without dying
    pub stun: SimDuration,
    /// Respawn after death
    pub respawn: RespawnPolicy,
    /// Length of the respawn envelope
    pub respawn_duration: SimDuration,
}

impl Default for MoveSet {
    fn default() -> Self {
        Self::duel_fighter()
    }
}

impl MoveSet {
    /// Duel fighter: heavy attack, guard and dodge, respawns after five seconds.
    #[must_use]
    pub fn duel_fighter() -> Self {
        Self {
            kind: EntityKind::Fighter,
            size: Vec2::new(80.0, 120.0),
            max_health: 100,
            speed: 5.0,
            jump_impulse: -12.0,
            attack: AttackSpec::light(),
            heavy_attack: Some(AttackSpec::heavy()),
            dodge: Some(DodgeSpec::default()),
            can_block: true,
            block_factor: 0.2,
            block_drag: 0.7,
            roots_while_attacking: false,
            reach: 70.0,
            hitbox_height: 60.0,
            hitbox_lift: 0.0,
            knockback_lift: -3.0,
            stun: SimDuration::Ticks(30),
            respawn: RespawnPolicy::After(SimDuration::Seconds(5.0)),
            respawn_duration: SimDuration::Seconds(1.0),
        }
    }

    /// Adventurer for boss fights: fast and agile, slips through hits while
    /// dodging, no respawn.
    #[must_use]
    pub fn adventurer() -> Self {
        Self {
            size: Vec2::new(50.0, 80.0),
            max_health: 200,
            speed: 7.0,
            jump_impulse: -15.0,
            attack: AttackSpec::light().with_damage(20),
            heavy_attack: None,
            dodge: Some(DodgeSpec {
                evades_hits: true,
                ..DodgeSpec::default()
            }),
            reach: 60.0,
            hitbox_height: 50.0,
            hitbox_lift: 15.0,
            respawn: RespawnPolicy::Never,
            ..Self::duel_fighter()
        }
    }

    /// Boss: slow and heavy-hitting, roots while swinging, never respawns.
    #[must_use]
    pub fn boss() -> Self {
        Self {
            kind: EntityKind::Boss,
            size: Vec2::new(80.0, 100.0),
            max_health: 500,
            speed: 3.0,
            jump_impulse: 0.0,
            attack: AttackSpec {
                damage: 30,
                cooldown: SimDuration::Ticks(90),
                duration: SimDuration::Seconds(1.0),
                knockback: 8.0,
            },
            heavy_attack: None,
            dodge: None,
            can_block: false,
            roots_while_attacking: true,
            reach: 80.0,
            hitbox_height: 50.0,
            hitbox_lift: 25.0,
            respawn: RespawnPolicy::Never,
            ..Self::duel_fighter()
        }
    }

    /// Whether the tuning describes a simulable entity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.max_health > 0
            && self.size.x > 0.0
            && self.size.y > 0.0
            && self.size.is_finite()
            && self.speed.is_finite()
            && self.speed >= 0.0
    }
}
