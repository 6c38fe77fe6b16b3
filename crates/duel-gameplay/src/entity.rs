//! Simulated entities.
//!
//! An [`Entity`] is generic over kinds: its capabilities and tuning come from
//! a [`MoveSet`] and its decisions from a [`Controller`]. It owns all of its
//! state and never refers to another entity; cross-entity effects arrive
//! through the arbiter calling [`Entity::take_damage`] and
//! [`Entity::knockback`].
//!
//! A tick is split into phases so the arena can run each phase across every
//! entity before starting the next one:
//!
//! 1. [`Entity::begin_tick`]: life timers, then intent
//! 2. [`Entity::integrate`]: gravity, drag and displacement
//! 3. [`Entity::resolve_collisions`]: platform corrections and ground contact
//! 4. [`Entity::end_tick`]: cooldowns, state, animation and hitbox
//!
//! Dead and respawning entities skip everything but life timers and
//! animation.

use duel_common::{EntityId, Millis, SimDuration};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::action::{ActionState, Conditions, Cooldowns, Swing, SwingKind, SwingPhase};
use crate::ai::Controller;
use crate::animation::{AnimationProvider, AnimationTrack, ClipTable};
use crate::collision::{resolve_platforms, CollisionReport};
use crate::geometry::AABB;
use crate::intent::{Horizontal, Intent};
use crate::level::Level;
use crate::moveset::{AttackSpec, EntityKind, MoveSet, RespawnPolicy};
use crate::physics::{integrate, Body, Drag};
use crate::sound::SoundId;
use crate::timers::Envelope;

/// Direction an entity faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Facing negative x
    Left,
    /// Facing positive x
    #[default]
    Right,
}

impl Facing {
    /// Direction sign: -1 or 1.
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The other direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Facing from `from_x` toward `target_x`. Ties face right.
    #[must_use]
    pub fn toward(from_x: f32, target_x: f32) -> Self {
        if target_x < from_x {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Side an entity fights for. Entities on the same team never hit each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team(pub u8);

/// Result of [`Entity::take_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageOutcome {
    /// The entity was out of play
    Ignored,
    /// The entity survived and is stunned
    Hurt {
        /// Health actually removed
        dealt: i32,
    },
    /// The hit was lethal
    Killed {
        /// Health actually removed
        dealt: i32,
    },
}

impl DamageOutcome {
    /// Health actually removed.
    #[must_use]
    pub fn dealt(self) -> i32 {
        match self {
            Self::Ignored => 0,
            Self::Hurt { dealt } | Self::Killed { dealt } => dealt,
        }
    }
}

/// What the renderer needs to draw an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState<'a, F> {
    /// Current frame, `None` when the state has no frames
    pub frame: Option<&'a F>,
    /// Facing, for mirroring
    pub facing: Facing,
    /// Body rectangle in world space
    pub rect: AABB,
}

/// A simulated combatant.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    name: String,
    team: Team,
    moveset: MoveSet,
    base: MoveSet,
    controller: Controller,
    body: Body,
    spawn: Vec2,
    spawn_facing: Facing,
    facing: Facing,
    health: i32,
    conditions: Conditions,
    cooldowns: Cooldowns,
    swing: Option<Swing>,
    hitbox: Option<AABB>,
    died_at: Option<Millis>,
    respawn_envelope: Option<Envelope>,
    track: AnimationTrack,
    clips: ClipTable,
    sounds: Vec<SoundId>,
}

impl Entity {
    /// Creates an entity at its spawn point with full health.
    #[must_use]
    pub fn new(moveset: MoveSet, spawn: Vec2, facing: Facing) -> Self {
        Self {
            id: EntityId::new(),
            name: moveset.kind.display_name().to_string(),
            team: Team::default(),
            body: Body::new(spawn, moveset.size),
            health: moveset.max_health,
            base: moveset.clone(),
            moveset,
            controller: Controller::Manual,
            spawn,
            spawn_facing: facing,
            facing,
            conditions: Conditions::default(),
            cooldowns: Cooldowns::default(),
            swing: None,
            hitbox: None,
            died_at: None,
            respawn_envelope: None,
            track: AnimationTrack::default(),
            clips: ClipTable::placeholder(),
            sounds: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the team.
    #[must_use]
    pub fn with_team(mut self, team: Team) -> Self {
        self.team = team;
        self
    }

    /// Sets the controller.
    #[must_use]
    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    /// Replaces the controller in place.
    pub fn set_controller(&mut self, controller: Controller) {
        self.controller = controller;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Unique ID.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind, from the move set.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.moveset.kind
    }

    /// Team.
    #[must_use]
    pub fn team(&self) -> Team {
        self.team
    }

    /// Current tuning, including any boss phase bonuses.
    #[must_use]
    pub fn moveset(&self) -> &MoveSet {
        &self.moveset
    }

    /// Tuning the entity was built with. Respawning restores it.
    #[must_use]
    pub fn base_moveset(&self) -> &MoveSet {
        &self.base
    }

    /// Controller.
    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Kinematic body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Velocity per tick.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    /// Body rectangle.
    #[must_use]
    pub fn rect(&self) -> AABB {
        self.body.rect()
    }

    /// Body center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Whether the body rested on a platform after the last collision pass.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.body.grounded
    }

    /// Spawn point.
    #[must_use]
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Current health, always within `[0, max_health]`.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.moveset.max_health
    }

    /// Health as a fraction of the maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.moveset.max_health.max(1) as f32
    }

    /// Action conditions.
    #[must_use]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Tick cooldowns.
    #[must_use]
    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    /// State resolved at the end of the last tick.
    #[must_use]
    pub fn state(&self) -> ActionState {
        self.track.state()
    }

    /// Animation track.
    #[must_use]
    pub fn track(&self) -> &AnimationTrack {
        &self.track
    }

    /// Swing in progress.
    #[must_use]
    pub fn swing(&self) -> Option<&Swing> {
        self.swing.as_ref()
    }

    /// Attack hitbox, present only inside the activation window.
    #[must_use]
    pub fn hitbox(&self) -> Option<AABB> {
        self.hitbox
    }

    /// Whether health reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.conditions.dead
    }

    /// Whether the entity is dead and will never come back.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.conditions.dead && !self.moveset.respawn.can_respawn()
    }

    /// Whether the entity can currently hit or be hit.
    #[must_use]
    pub fn is_in_play(&self) -> bool {
        !self.conditions.is_out_of_play()
    }

    /// Whether the entity is guarding against an attacker standing at `x`.
    #[must_use]
    pub fn guards_against(&self, x: f32) -> bool {
        self.conditions.blocking && (x - self.center().x) * self.facing.sign() >= 0.0
    }

    /// Whether incoming hits currently pass through.
    #[must_use]
    pub fn is_evading(&self) -> bool {
        self.conditions.dodging && self.moveset.dodge.is_some_and(|dodge| dodge.evades_hits)
    }

    /// Removes and returns the sound cues emitted since the last drain.
    pub fn drain_sounds(&mut self) -> std::vec::Drain<'_, SoundId> {
        self.sounds.drain(..)
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Starts a light attack. Returns `false` when the request is denied.
    pub fn attack(&mut self, now: Millis) -> bool {
        if !self.can_start_swing() || !self.cooldowns.attack.is_ready() {
            return false;
        }
        let spec = self.moveset.attack;
        self.start_swing(SwingKind::Light, spec, now);
        self.cooldowns.attack.start(spec.cooldown);
        true
    }

    /// Starts a heavy attack. Returns `false` when the request is denied.
    pub fn heavy_attack(&mut self, now: Millis) -> bool {
        let Some(spec) = self.moveset.heavy_attack else {
            return false;
        };
        if !self.can_start_swing() || !self.cooldowns.heavy_attack.is_ready() {
            return false;
        }
        self.start_swing(SwingKind::Heavy, spec, now);
        self.cooldowns.heavy_attack.start(spec.cooldown);
        true
    }

    fn can_start_swing(&self) -> bool {
        !self.conditions.attacking && !self.conditions.is_incapacitated()
    }

    fn start_swing(&mut self, kind: SwingKind, spec: AttackSpec, now: Millis) {
        self.conditions.attacking = true;
        self.conditions.heavy_attacking = kind == SwingKind::Heavy;
        self.swing = Some(Swing::new(kind, spec.damage, spec.knockback, now, spec.duration));
        self.hitbox = None;
        self.track.reset();
        debug!("{} {} starts {:?} swing", self.name, self.id, kind);
    }

    /// Ends the swing in progress, closing its hitbox.
    pub fn end_swing(&mut self) {
        self.conditions.attacking = false;
        self.conditions.heavy_attacking = false;
        self.swing = None;
        self.hitbox = None;
    }

    /// Raises the guard.
    pub fn start_block(&mut self) {
        if !self.moveset.can_block || self.conditions.is_incapacitated() || self.conditions.blocking {
            return;
        }
        self.conditions.blocking = true;
        trace!("{} {} raises guard", self.name, self.id);
    }

    /// Drops the guard.
    pub fn stop_block(&mut self) {
        self.conditions.blocking = false;
    }

    /// Jumps off the ground. Returns `false` when the request is denied.
    pub fn jump(&mut self) -> bool {
        if !self.body.grounded || self.conditions.attacking || self.conditions.is_incapacitated() {
            return false;
        }
        self.body.velocity.y = self.moveset.jump_impulse;
        self.body.grounded = false;
        self.sounds.push(SoundId::Jump);
        true
    }

    /// Dodges along the facing direction. Returns `false` when denied.
    pub fn dodge(&mut self) -> bool {
        let Some(spec) = self.moveset.dodge else {
            return false;
        };
        let c = &self.conditions;
        if c.attacking || c.blocking || c.dodging || c.is_incapacitated() || !self.cooldowns.dodge.is_ready() {
            return false;
        }

        self.conditions.dodging = true;
        self.body.velocity.x = self.facing.sign() * spec.impulse;
        self.cooldowns.dodge_window.start(spec.window);
        self.cooldowns.dodge.start(spec.cooldown);
        self.sounds.push(SoundId::Dodge);
        debug!("{} {} dodges {:?}", self.name, self.id, self.facing);
        true
    }

    /// Removes health. Survivors are stunned and restart their hurt
    /// animation; a lethal hit kills.
    pub fn take_damage(&mut self, amount: i32, now: Millis) -> DamageOutcome {
        if self.conditions.is_out_of_play() {
            return DamageOutcome::Ignored;
        }

        let dealt = amount.clamp(0, self.health);
        self.health -= dealt;
        self.escalate_brain();

        if self.health > 0 {
            self.stun(self.moveset.stun);
            self.track.set_state(ActionState::Hurt);
            self.track.reset();
            DamageOutcome::Hurt { dealt }
        } else {
            self.die(now);
            DamageOutcome::Killed { dealt }
        }
    }

    /// Overrides velocity with a knockback impulse.
    pub fn knockback(&mut self, direction: Facing, force: f32) {
        if self.conditions.is_out_of_play() {
            return;
        }
        self.body.velocity = Vec2::new(direction.sign() * force, self.moveset.knockback_lift);
        self.body.grounded = false;
    }

    /// Stuns the entity, cancelling any swing in progress.
    pub fn stun(&mut self, duration: SimDuration) {
        if self.conditions.is_out_of_play() || duration.as_ticks() == 0 {
            return;
        }
        self.conditions.stunned = true;
        self.cooldowns.stun.start(duration);
        if self.conditions.attacking {
            self.end_swing();
        }
    }

    /// Kills the entity.
    pub fn die(&mut self, now: Millis) {
        if self.conditions.dead {
            return;
        }
        self.health = 0;
        self.conditions = Conditions {
            dead: true,
            ..Conditions::default()
        };
        self.body.velocity = Vec2::ZERO;
        self.swing = None;
        self.hitbox = None;
        self.died_at = Some(now);
        self.respawn_envelope = None;
        self.track.set_state(ActionState::Death);
        info!("{} {} died", self.name, self.id);
    }

    /// Brings a dead entity back at its spawn point.
    ///
    /// Returns `false` when the entity is alive or its kind never respawns.
    pub fn respawn(&mut self, now: Millis) -> bool {
        if !self.conditions.dead || !self.moveset.respawn.can_respawn() {
            return false;
        }
        self.conditions = Conditions {
            respawning: true,
            ..Conditions::default()
        };
        self.moveset = self.base.clone();
        self.controller.reset();
        self.health = self.moveset.max_health;
        self.body.position = self.spawn;
        self.body.velocity = Vec2::ZERO;
        self.body.grounded = false;
        self.facing = self.spawn_facing;
        self.cooldowns.reset();
        self.died_at = None;
        self.respawn_envelope = Some(Envelope::new(now, self.moveset.respawn_duration));
        self.track.set_state(ActionState::Respawn);
        info!("{} {} respawning", self.name, self.id);
        true
    }

    fn escalate_brain(&mut self) {
        let fraction = self.health_fraction();
        if let Controller::Brute(brain) = &mut self.controller {
            if let Some(change) = brain.escalate(fraction) {
                self.moveset.speed += change.speed_bonus;
                self.moveset.attack.damage += change.damage_bonus;
                info!(
                    "{} {} enters phase {} (speed {}, damage {})",
                    self.name, self.id, change.phase, self.moveset.speed, self.moveset.attack.damage
                );
            }
        }
    }

    fn walk(&mut self, movement: Horizontal) {
        let c = &self.conditions;
        if c.stunned || c.dodging || (self.moveset.roots_while_attacking && c.attacking) {
            return;
        }
        match movement {
            Horizontal::Left => self.facing = Facing::Left,
            Horizontal::Right => self.facing = Facing::Right,
            Horizontal::Still => {},
        }
        self.body.velocity.x = movement.sign() * self.moveset.speed;
    }

    // ------------------------------------------------------------------
    // Tick phases
    // ------------------------------------------------------------------

    /// Runs life timers, then consumes this tick's intent.
    ///
    /// `target` is the center of the nearest opponent, read by brains.
    pub fn begin_tick(&mut self, submitted: Intent, target: Option<Vec2>, now: Millis) {
        self.update_life_timers(now);
        if self.conditions.is_out_of_play() {
            return;
        }

        let center_x = self.center().x;
        let intent = self.controller.decide(submitted, center_x, target);
        if intent.block {
            self.start_block();
        } else {
            self.stop_block();
        }
        self.walk(intent.movement);
        if intent.attack {
            self.attack(now);
        }
        if intent.heavy_attack {
            self.heavy_attack(now);
        }
        if intent.jump {
            self.jump();
        }
        if intent.dodge {
            self.dodge();
        }
        if self.moveset.roots_while_attacking && self.conditions.attacking {
            self.body.velocity.x = 0.0;
        }
    }

    fn update_life_timers(&mut self, now: Millis) {
        if self.conditions.dead {
            if let (RespawnPolicy::After(delay), Some(died_at)) = (self.moveset.respawn, self.died_at) {
                if now.since(died_at) >= delay.as_millis() {
                    self.respawn(now);
                }
            }
        } else if self.conditions.respawning
            && self.respawn_envelope.map_or(true, |envelope| envelope.is_complete(now))
        {
            self.conditions.respawning = false;
            self.respawn_envelope = None;
            debug!("{} {} back in play", self.name, self.id);
        }
    }

    /// Applies gravity, drag and velocity.
    pub fn integrate(&mut self, gravity: f32) {
        if self.conditions.is_out_of_play() {
            return;
        }
        let mut drag = Drag::NONE;
        if self.conditions.blocking {
            drag.horizontal = self.moveset.block_drag;
        }
        if self.conditions.dodging {
            if let Some(dodge) = self.moveset.dodge {
                drag.vertical = dodge.vertical_damping;
            }
        }
        integrate(&mut self.body, gravity, drag);
    }

    /// Resolves the body against the level's platforms.
    pub fn resolve_collisions(&mut self, level: &Level) -> CollisionReport {
        if self.conditions.is_out_of_play() {
            return CollisionReport::default();
        }
        resolve_platforms(&mut self.body, level.platforms(), level.probe())
    }

    /// Counts cooldowns down, then settles state, animation and hitbox.
    pub fn end_tick(&mut self, now: Millis) {
        if !self.conditions.is_out_of_play() {
            let elapsed = self.cooldowns.tick();
            if elapsed.stun {
                self.conditions.stunned = false;
            }
            if elapsed.dodge_window {
                self.conditions.dodging = false;
                if let Some(dodge) = self.moveset.dodge {
                    self.body.velocity.x *= dodge.exit_factor;
                }
            }
            if self.swing.is_some_and(|swing| swing.phase(now) == SwingPhase::Finished) {
                self.end_swing();
            }
        }

        let moving = self.body.velocity.x.abs() > f32::EPSILON;
        let state = self.conditions.resolve(self.body.grounded, moving);
        let previous = self.track.state();
        if self.track.set_state(state) {
            debug!("{} {} {:?} -> {:?}", self.name, self.id, previous, state);
        }
        let progress = self.animation_progress(now);
        self.track.advance(self.clips.get(state), progress);
        self.hitbox = self.compute_hitbox(now);
    }

    /// Runs every phase of a tick for a lone entity.
    pub fn tick(&mut self, intent: Intent, level: &Level, now: Millis) {
        self.begin_tick(intent, None, now);
        self.integrate(level.gravity());
        self.resolve_collisions(level);
        self.end_tick(now);
    }

    fn animation_progress(&self, now: Millis) -> f32 {
        match self.track.state() {
            ActionState::Attack | ActionState::HeavyAttack => {
                self.swing.map_or(1.0, |swing| swing.progress(now))
            },
            ActionState::Respawn => self.respawn_envelope.map_or(1.0, |envelope| envelope.progress(now)),
            _ => 0.0,
        }
    }

    fn compute_hitbox(&self, now: Millis) -> Option<AABB> {
        if !self.conditions.attacking || self.conditions.is_incapacitated() {
            return None;
        }
        let swing = self.swing?;
        if !swing.is_active(now) {
            return None;
        }

        let rect = self.rect();
        let reach = self.moveset.reach;
        let band_center = rect.center().y - self.moveset.hitbox_lift;
        let half_band = self.moveset.hitbox_height / 2.0;
        let (min_x, max_x) = match self.facing {
            Facing::Right => (rect.max_x, rect.max_x + reach),
            Facing::Left => (rect.min_x - reach, rect.min_x),
        };
        Some(AABB::new(min_x, band_center - half_band, max_x, band_center + half_band))
    }

    /// Frame, facing and rectangle to draw.
    #[must_use]
    pub fn draw_state<'a, P: AnimationProvider + ?Sized>(&self, provider: &'a P) -> DrawState<'a, P::Frame> {
        let frames = provider.frames(self.kind(), self.state());
        DrawState {
            frame: self.track.frame_index(frames.len()).and_then(|index| frames.get(index)),
            facing: self.facing,
            rect: self.rect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{BruteBrain, BruteTuning};
    use crate::animation::PlaceholderAnimations;
    use crate::collision::GroundProbe;
    use proptest::prelude::*;

    fn floor() -> Level {
        Level::new(vec![AABB::from_xywh(0.0, 550.0, 1000.0, 50.0)], 0.5, GroundProbe::default())
            .expect("valid level")
    }

    /// Fighter standing on the floor after one settling tick at t=0.
    fn grounded(moveset: MoveSet) -> (Entity, Level) {
        let level = floor();
        let y = 550.0 - moveset.size.y;
        let mut e = Entity::new(moveset, Vec2::new(300.0, y), Facing::Right);
        e.tick(Intent::IDLE, &level, Millis::ZERO);
        (e, level)
    }

    fn ms(value: u64) -> Millis {
        Millis::new(value)
    }

    #[test]
    fn test_settles_on_floor() {
        let (e, _) = grounded(MoveSet::duel_fighter());
        assert!(e.is_grounded());
        assert_eq!(e.rect().max_y, 550.0);
        assert_eq!(e.velocity(), Vec2::ZERO);
        assert_eq!(e.state(), ActionState::Idle);
    }

    #[test]
    fn test_jump_from_rest() {
        let (mut e, _) = grounded(MoveSet::duel_fighter());
        assert!(e.jump());
        assert_eq!(e.velocity().y, -12.0);
        assert!(!e.is_grounded());
        assert_eq!(e.drain_sounds().collect::<Vec<_>>(), vec![SoundId::Jump]);
        assert!(!e.jump());
    }

    #[test]
    fn test_jump_through_tick_leaves_ground() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        e.tick(Intent::IDLE.with_jump(), &level, ms(16));
        assert!(!e.is_grounded());
        assert_eq!(e.velocity().y, -11.5);
        assert_eq!(e.state(), ActionState::Jump);
    }

    #[test]
    fn test_damage_stuns_for_fixed_ticks() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        assert_eq!(e.take_damage(10, ms(0)), DamageOutcome::Hurt { dealt: 10 });
        assert_eq!(e.health(), 90);
        assert!(e.conditions().stunned);

        for _ in 0..29 {
            e.tick(Intent::IDLE, &level, ms(0));
            assert_eq!(e.state(), ActionState::Hurt);
        }
        e.tick(Intent::IDLE, &level, ms(0));
        assert!(!e.conditions().stunned);
        assert_eq!(e.state(), ActionState::Idle);
    }

    #[test]
    fn test_stunned_entity_ignores_walking() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        e.stun(SimDuration::Ticks(10));
        e.tick(Intent::walk(Horizontal::Left), &level, ms(16));
        assert_eq!(e.velocity().x, 0.0);
        assert_eq!(e.facing(), Facing::Right);
    }

    #[test]
    fn test_rejected_attack_changes_nothing() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        assert!(e.attack(ms(0)));
        e.tick(Intent::IDLE, &level, ms(16));
        let snapshot = e.clone();
        assert!(!e.attack(ms(32)));
        assert_eq!(e, snapshot);
    }

    #[test]
    fn test_attack_waits_for_cooldown() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        assert!(e.attack(ms(0)));
        // Swing finishes at 700ms; cooldown is 45 ticks.
        for tick in 1..=44u64 {
            e.tick(Intent::IDLE, &level, ms(tick * 16));
        }
        e.tick(Intent::IDLE, &level, ms(1000));
        assert!(!e.conditions().attacking);
        assert!(e.cooldowns().attack.is_ready());
        assert!(e.attack(ms(1000)));
    }

    #[test]
    fn test_stunned_entity_cannot_attack() {
        let (mut e, _) = grounded(MoveSet::duel_fighter());
        e.stun(SimDuration::Ticks(30));
        assert!(!e.attack(ms(0)));
        assert!(!e.heavy_attack(ms(0)));
        assert!(!e.jump());
        assert!(!e.dodge());
    }

    #[test]
    fn test_hitbox_follows_activation_window() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        assert!(e.attack(ms(0)));

        e.tick(Intent::IDLE, &level, ms(100));
        assert_eq!(e.state(), ActionState::Attack);
        assert_eq!(e.hitbox(), None);

        e.tick(Intent::IDLE, &level, ms(500));
        assert_eq!(e.hitbox(), Some(AABB::new(380.0, 460.0, 450.0, 520.0)));

        e.tick(Intent::IDLE, &level, ms(680));
        assert_eq!(e.hitbox(), None);
        assert!(e.conditions().attacking);

        e.tick(Intent::IDLE, &level, ms(700));
        assert!(!e.conditions().attacking);
        assert_eq!(e.state(), ActionState::Idle);
    }

    #[test]
    fn test_hitbox_extends_toward_facing() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        e.tick(Intent::walk(Horizontal::Left), &level, ms(0));
        e.tick(Intent::IDLE, &level, ms(0));
        let left = e.rect().min_x;
        assert!(e.attack(ms(0)));
        e.tick(Intent::IDLE, &level, ms(500));
        let hitbox = e.hitbox().expect("window open");
        assert_eq!(hitbox.max_x, left);
        assert_eq!(hitbox.min_x, left - 70.0);
    }

    #[test]
    fn test_heavy_attack_sets_heavy_flag() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        assert!(e.heavy_attack(ms(0)));
        e.tick(Intent::IDLE, &level, ms(16));
        assert!(e.conditions().heavy_attacking);
        assert_eq!(e.state(), ActionState::HeavyAttack);
        assert_eq!(e.cooldowns().heavy_attack.remaining(), 59);
        assert!(!e.attack(ms(16)));
    }

    #[test]
    fn test_stun_cancels_swing() {
        let (mut e, _) = grounded(MoveSet::duel_fighter());
        assert!(e.attack(ms(0)));
        e.take_damage(5, ms(10));
        assert!(!e.conditions().attacking);
        assert!(e.swing().is_none());
    }

    #[test]
    fn test_block_is_held_and_drags() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        e.tick(Intent::walk(Horizontal::Right).with_block(), &level, ms(16));
        assert!(e.conditions().blocking);
        assert_eq!(e.state(), ActionState::Block);
        assert!((e.velocity().x - 3.5).abs() < 1e-6);

        e.tick(Intent::IDLE, &level, ms(32));
        assert!(!e.conditions().blocking);
    }

    #[test]
    fn test_boss_cannot_block() {
        let (mut e, _) = grounded(MoveSet::boss());
        e.start_block();
        assert!(!e.conditions().blocking);
    }

    #[test]
    fn test_guard_faces_attacker() {
        let (mut e, _) = grounded(MoveSet::duel_fighter());
        e.start_block();
        let center = e.center().x;
        assert!(e.guards_against(center + 100.0));
        assert!(!e.guards_against(center - 100.0));
    }

    #[test]
    fn test_dodge_window_and_exit() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        assert!(e.dodge());
        assert_eq!(e.velocity().x, 15.0);
        assert_eq!(e.drain_sounds().collect::<Vec<_>>(), vec![SoundId::Dodge]);

        for _ in 0..19 {
            e.tick(Intent::walk(Horizontal::Left), &level, ms(0));
            assert_eq!(e.velocity().x, 15.0);
            assert_eq!(e.state(), ActionState::Dodge);
        }
        e.tick(Intent::IDLE, &level, ms(0));
        assert!(!e.conditions().dodging);
        assert_eq!(e.velocity().x, 7.5);
        assert!(!e.dodge());
    }

    #[test]
    fn test_lethal_damage_kills() {
        let (mut e, _) = grounded(MoveSet::duel_fighter());
        assert_eq!(e.take_damage(500, ms(0)), DamageOutcome::Killed { dealt: 100 });
        assert_eq!(e.health(), 0);
        assert!(e.is_dead());
        assert_eq!(e.state(), ActionState::Death);
        assert_eq!(e.take_damage(10, ms(1)), DamageOutcome::Ignored);
    }

    #[test]
    fn test_dead_entity_ignores_everything() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        e.die(ms(0));
        let before = e.position();
        assert!(!e.attack(ms(10)));
        assert!(!e.jump());
        assert!(!e.dodge());
        e.start_block();
        e.knockback(Facing::Left, 8.0);
        e.tick(Intent::walk(Horizontal::Left).with_attack(), &level, ms(100));
        assert_eq!(e.position(), before);
        assert_eq!(e.velocity(), Vec2::ZERO);
        assert!(!e.conditions().blocking);
    }

    #[test]
    fn test_respawn_cycle() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        let spawn = e.spawn();
        e.take_damage(40, ms(0));
        e.knockback(Facing::Right, 8.0);
        for t in 1..=20u64 {
            e.tick(Intent::walk(Horizontal::Right), &level, ms(t * 16));
        }
        e.die(ms(1000));

        e.tick(Intent::IDLE, &level, ms(5999));
        assert!(e.is_dead());

        e.tick(Intent::IDLE, &level, ms(6000));
        assert!(!e.is_dead());
        assert!(e.conditions().respawning);
        assert_eq!(e.state(), ActionState::Respawn);
        assert_eq!(e.position(), spawn);
        assert_eq!(e.health(), e.max_health());
        assert!(!e.attack(ms(6100)));

        e.tick(Intent::walk(Horizontal::Left), &level, ms(6999));
        assert!(e.conditions().respawning);
        assert_eq!(e.position(), spawn);

        e.tick(Intent::IDLE, &level, ms(7000));
        assert!(!e.conditions().respawning);
        assert_eq!(e.position(), spawn);
        assert_eq!(*e.conditions(), Conditions::default());
        assert_eq!(e.state(), ActionState::Idle);
    }

    #[test]
    fn test_boss_never_respawns() {
        let (mut e, level) = grounded(MoveSet::boss());
        e.die(ms(0));
        assert!(!e.respawn(ms(10)));
        e.tick(Intent::IDLE, &level, ms(60_000));
        assert!(e.is_defeated());
    }

    #[test]
    fn test_boss_roots_while_attacking() {
        let (mut e, level) = grounded(MoveSet::boss());
        e.tick(Intent::walk(Horizontal::Left).with_attack(), &level, ms(16));
        assert!(e.conditions().attacking);
        assert_eq!(e.velocity().x, 0.0);
        assert_eq!(e.facing(), Facing::Left);
    }

    #[test]
    fn test_boss_phase_escalates_on_damage() {
        let (e, _) = grounded(MoveSet::boss());
        let mut e = e.with_controller(Controller::Brute(BruteBrain::default()));
        e.take_damage(210, ms(0));
        assert_eq!(e.moveset().speed, 4.0);
        assert_eq!(e.moveset().attack.damage, 40);
        e.take_damage(150, ms(0));
        assert_eq!(e.moveset().speed, 5.0);
        assert_eq!(e.moveset().attack.damage, 50);
    }

    #[test]
    fn test_autopilot_fighter_keeps_its_tuning() {
        let (e, level) = grounded(MoveSet::duel_fighter());
        let mut e = e.with_controller(Controller::Brute(BruteBrain::new(BruteTuning::autopilot())));
        e.take_damage(75, ms(0));
        assert_eq!(e.moveset(), e.base_moveset());

        e.die(ms(0));
        e.tick(Intent::IDLE, &level, ms(5000));
        assert!(e.conditions().respawning);
        assert_eq!(e.moveset().attack.damage, 10);
        assert_eq!(e.moveset().speed, 5.0);
    }

    #[test]
    fn test_respawn_restores_base_tuning() {
        let mut boss = MoveSet::boss();
        boss.respawn = RespawnPolicy::After(SimDuration::Seconds(5.0));
        let (e, level) = grounded(boss);
        let mut e = e.with_controller(Controller::Brute(BruteBrain::default()));
        e.take_damage(360, ms(0));
        assert_eq!(e.moveset().attack.damage, 50);

        e.die(ms(0));
        e.tick(Intent::IDLE, &level, ms(5000));
        assert!(!e.is_dead());
        assert_eq!(e.moveset(), e.base_moveset());
        assert!(matches!(e.controller(), Controller::Brute(brain) if brain.phase() == 0));
    }

    #[test]
    fn test_each_hit_restarts_hurt_animation() {
        let (mut e, level) = grounded(MoveSet::duel_fighter());
        e.take_damage(10, ms(0));
        assert_eq!(e.state(), ActionState::Hurt);
        assert_eq!(e.track().cursor(), 0.0);

        for t in 1..=10u64 {
            e.tick(Intent::IDLE, &level, ms(t * 16));
        }
        assert!(e.track().cursor() > 0.0);

        e.take_damage(10, ms(176));
        assert_eq!(e.state(), ActionState::Hurt);
        assert_eq!(e.track().cursor(), 0.0);
    }

    #[test]
    fn test_only_evading_dodges_slip_hits() {
        let (mut fighter, _) = grounded(MoveSet::duel_fighter());
        assert!(fighter.dodge());
        assert!(!fighter.is_evading());

        let (mut adventurer, _) = grounded(MoveSet::adventurer());
        assert!(!adventurer.is_evading());
        assert!(adventurer.dodge());
        assert!(adventurer.is_evading());
    }

    #[test]
    fn test_knockback_overrides_velocity() {
        let (mut e, _) = grounded(MoveSet::duel_fighter());
        e.knockback(Facing::Left, 8.0);
        assert_eq!(e.velocity(), Vec2::new(-8.0, -3.0));
        assert!(!e.is_grounded());
    }

    #[test]
    fn test_draw_state_uses_provider() {
        let (e, _) = grounded(MoveSet::duel_fighter());
        let provider = PlaceholderAnimations::new();
        let draw = e.draw_state(&provider);
        assert_eq!(draw.frame.map(|f| f.state), Some(ActionState::Idle));
        assert_eq!(draw.facing, Facing::Right);
        assert_eq!(draw.rect, e.rect());

        let empty = PlaceholderAnimations::new().without(ActionState::Idle);
        assert!(e.draw_state(&empty).frame.is_none());
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(hits in proptest::collection::vec(-20i32..60, 1..30)) {
            let (mut e, level) = grounded(MoveSet::duel_fighter());
            for (i, amount) in hits.into_iter().enumerate() {
                let now = ms(i as u64 * 16);
                e.take_damage(amount, now);
                e.tick(Intent::IDLE, &level, now);
                prop_assert!(e.health() >= 0 && e.health() <= e.max_health());
                prop_assert_eq!(e.health() == 0, e.is_dead());
            }
        }

        #[test]
        fn prop_attack_on_cooldown_is_rejected(ticks in 1u32..44) {
            let (mut e, level) = grounded(MoveSet::duel_fighter());
            prop_assert!(e.attack(ms(0)));
            for _ in 0..ticks {
                e.tick(Intent::IDLE, &level, ms(2000));
            }
            prop_assume!(!e.cooldowns().attack.is_ready());
            let snapshot = e.clone();
            prop_assert!(!e.attack(ms(2000)));
            prop_assert_eq!(e, snapshot);
        }
    }
}
