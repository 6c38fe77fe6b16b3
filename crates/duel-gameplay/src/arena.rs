//! The arena: entities, level, camera and sound queue.
//!
//! The arena owns everything and drives a tick phase by phase:
//!
//! 1. intents (submitted or decided by brains) and life timers
//! 2. integration for every entity
//! 3. collision resolution for every entity
//! 4. cooldowns, state, animation and hitboxes for every entity
//! 5. combat arbitration across all pairs
//!
//! No phase starts before the previous one has run for every entity, so
//! arbitration always sees finalized positions and hitboxes.

use std::collections::HashMap;

use duel_common::{ArenaError, EntityId, LevelError, Millis};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::ai::{BruteBrain, BruteTuning, Controller};
use crate::arbiter::{arbitrate, HitReport};
use crate::camera::Camera;
use crate::entity::{Entity, Facing, Team};
use crate::intent::Intent;
use crate::level::{Level, LevelPreset};
use crate::moveset::{EntityKind, MoveSet};
use crate::sound::{SoundDispatcher, SoundQueue};

/// Team of player-style fighters in a boss fight, and of the first duelist.
pub const PLAYER_TEAM: Team = Team(0);

/// Team of the second duelist.
pub const RIVAL_TEAM: Team = Team(1);

/// Team of bosses.
pub const BOSS_TEAM: Team = Team(2);

/// Match setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Two fighters on the duel arena
    #[default]
    Duel,
    /// One adventurer against the lair's bosses
    BossFight,
}

/// Overall result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Still being fought
    #[default]
    Ongoing,
    /// Every boss is dead
    Victory,
    /// Every fighter is dead for good
    Defeat,
}

/// Result of one arena step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Index of the tick just run, starting at 0
    pub tick: u64,
    /// Hits applied this tick
    pub hits: Vec<HitReport>,
    /// Match status after the tick
    pub status: MatchStatus,
}

/// Owner of the simulation.
#[derive(Debug, Clone)]
pub struct Arena {
    level: Level,
    entities: Vec<Entity>,
    pending: HashMap<EntityId, Intent>,
    sounds: SoundQueue,
    camera: Camera,
    tick: u64,
    status: MatchStatus,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new(level: Level, viewport: Vec2) -> Self {
        Self {
            level,
            entities: Vec::new(),
            pending: HashMap::new(),
            sounds: SoundQueue::new(),
            camera: Camera::new(viewport),
            tick: 0,
            status: MatchStatus::Ongoing,
        }
    }

    /// Two duel fighters facing each other on the duel arena.
    pub fn duel(viewport: Vec2) -> Result<Self, LevelError> {
        Self::duel_with(viewport, &MoveSet::duel_fighter())
    }

    /// Duel with custom fighter tuning.
    pub fn duel_with(viewport: Vec2, fighter: &MoveSet) -> Result<Self, LevelError> {
        let preset = LevelPreset::DuelArena;
        let mut arena = Self::new(preset.build(viewport)?, viewport);
        let spawns = preset.player_spawns();
        let facings = [Facing::Right, Facing::Left];
        let teams = [PLAYER_TEAM, RIVAL_TEAM];

        for (i, ((spawn, facing), team)) in spawns.into_iter().zip(facings).zip(teams).enumerate() {
            arena.spawn(
                Entity::new(fighter.clone(), spawn, facing)
                    .with_name(format!("Player {}", i + 1))
                    .with_team(team),
            );
        }
        arena.focus_camera(true);
        Ok(arena)
    }

    /// An adventurer against brain-driven bosses in the lair.
    pub fn boss_fight(viewport: Vec2) -> Result<Self, LevelError> {
        Self::boss_fight_with(viewport, &MoveSet::adventurer(), &MoveSet::boss())
    }

    /// Boss fight with custom tuning.
    pub fn boss_fight_with(viewport: Vec2, hero: &MoveSet, boss: &MoveSet) -> Result<Self, LevelError> {
        let preset = LevelPreset::BossLair;
        let mut arena = Self::new(preset.build(viewport)?, viewport);

        for spawn in preset.player_spawns() {
            arena.spawn(
                Entity::new(hero.clone(), spawn, Facing::Right)
                    .with_name("Adventurer")
                    .with_team(PLAYER_TEAM),
            );
        }
        for (i, spawn) in preset.boss_spawns().into_iter().enumerate() {
            arena.spawn(
                Entity::new(boss.clone(), spawn, Facing::Left)
                    .with_name(format!("Boss {}", i + 1))
                    .with_team(BOSS_TEAM)
                    .with_controller(Controller::Brute(BruteBrain::default())),
            );
        }
        arena.focus_camera(true);
        Ok(arena)
    }

    /// Adds an entity. Returns its ID.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        debug!("Spawned {} {} at {:?}", entity.name(), id, entity.position());
        self.entities.push(entity);
        id
    }

    /// Replaces the level. Entities keep their positions.
    pub fn replace_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Queues the intent an entity consumes on the next step.
    ///
    /// Held inputs such as the guard must be submitted every tick.
    pub fn submit(&mut self, id: EntityId, intent: Intent) -> Result<(), ArenaError> {
        if self.entity(id).is_none() {
            return Err(ArenaError::UnknownEntity(id));
        }
        self.pending.insert(id, intent);
        Ok(())
    }

    /// Replaces an entity's controller.
    pub fn set_controller(&mut self, id: EntityId, controller: Controller) -> Result<(), ArenaError> {
        let index = self.index_of(id)?;
        self.entities[index].set_controller(controller);
        Ok(())
    }

    /// Hands every fighter over to a brain. Unlike bosses, these brains never
    /// escalate, so fighters keep their tuning however hurt they get.
    pub fn enable_autopilot(&mut self) {
        for entity in &mut self.entities {
            if entity.kind() == EntityKind::Fighter && !entity.controller().is_ai() {
                entity.set_controller(Controller::Brute(BruteBrain::new(BruteTuning::autopilot())));
            }
        }
    }

    /// Entity by ID.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// Mutable entity by ID, for drivers and tooling.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    fn index_of(&self, id: EntityId) -> Result<usize, ArenaError> {
        self.entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or(ArenaError::UnknownEntity(id))
    }

    /// All entities in spawn order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// IDs of all entities in spawn order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(Entity::id).collect()
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Match status after the last step.
    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Sound cues emitted since the last drain.
    pub fn sounds_mut(&mut self) -> &mut SoundQueue {
        &mut self.sounds
    }

    /// Sends pending sound cues to a dispatcher.
    pub fn dispatch_sounds(&mut self, dispatcher: &mut impl SoundDispatcher) -> usize {
        self.sounds.dispatch_to(dispatcher)
    }

    /// Runs one tick.
    pub fn step(&mut self, now: Millis) -> StepReport {
        let targets: Vec<Option<Vec2>> = self.entities.iter().map(|e| self.nearest_opponent(e)).collect();

        for (entity, target) in self.entities.iter_mut().zip(targets) {
            let intent = self.pending.remove(&entity.id()).unwrap_or_default();
            entity.begin_tick(intent, target, now);
        }
        self.pending.clear();

        let gravity = self.level.gravity();
        for entity in &mut self.entities {
            entity.integrate(gravity);
        }
        for entity in &mut self.entities {
            entity.resolve_collisions(&self.level);
        }
        for entity in &mut self.entities {
            entity.end_tick(now);
            self.sounds.extend(entity.drain_sounds());
        }

        let hits = arbitrate(&mut self.entities, now, &mut self.sounds);

        self.focus_camera(false);

        let status = self.evaluate_status();
        if status != self.status {
            info!("Match status {:?} -> {:?} at tick {}", self.status, status, self.tick);
            self.status = status;
        }

        trace!("Tick {} done: {} hits, {} sounds queued", self.tick, hits.len(), self.sounds.len());
        let report = StepReport {
            tick: self.tick,
            hits,
            status,
        };
        self.tick += 1;
        report
    }

    fn nearest_opponent(&self, entity: &Entity) -> Option<Vec2> {
        let x = entity.center().x;
        self.entities
            .iter()
            .filter(|other| other.team() != entity.team() && other.is_in_play())
            .map(Entity::center)
            .min_by(|a, b| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
    }

    fn focus_camera(&mut self, snap: bool) {
        let fighters: Vec<Vec2> = self
            .entities
            .iter()
            .filter(|e| e.kind() == EntityKind::Fighter && !e.is_dead())
            .map(Entity::center)
            .collect();
        if fighters.is_empty() {
            return;
        }

        let focus = fighters.iter().copied().sum::<Vec2>() / fighters.len() as f32;
        if snap {
            self.camera.snap_to(focus);
        } else {
            self.camera.follow(focus);
        }
    }

    fn evaluate_status(&self) -> MatchStatus {
        let mut bosses = self.entities.iter().filter(|e| e.kind() == EntityKind::Boss).peekable();
        if bosses.peek().is_none() {
            return MatchStatus::Ongoing;
        }
        if bosses.all(Entity::is_dead) {
            return MatchStatus::Victory;
        }

        let mut fighters = self
            .entities
            .iter()
            .filter(|e| e.kind() == EntityKind::Fighter)
            .peekable();
        if fighters.peek().is_some() && fighters.all(Entity::is_defeated) {
            return MatchStatus::Defeat;
        }
        MatchStatus::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionState;
    use crate::collision::GroundProbe;
    use crate::intent::Horizontal;
    use crate::sound::SoundId;

    const VIEWPORT: Vec2 = Vec2::new(1000.0, 600.0);

    fn ms_for_tick(tick: u64) -> Millis {
        Millis::new(tick * 1000 / 60)
    }

    fn run(arena: &mut Arena, ticks: u64) {
        for _ in 0..ticks {
            let now = ms_for_tick(arena.tick_count());
            arena.step(now);
        }
    }

    #[test]
    fn test_duel_setup() {
        let arena = Arena::duel(VIEWPORT).expect("valid preset");
        let entities = arena.entities();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].position(), Vec2::new(300.0, 300.0));
        assert_eq!(entities[0].facing(), Facing::Right);
        assert_eq!(entities[1].facing(), Facing::Left);
        assert_ne!(entities[0].team(), entities[1].team());
        assert_eq!(arena.status(), MatchStatus::Ongoing);
    }

    #[test]
    fn test_fighters_fall_and_land() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        run(&mut arena, 120);
        for e in arena.entities() {
            assert!(e.is_grounded(), "{} should be grounded", e.name());
            assert_eq!(e.state(), ActionState::Idle);
        }
    }

    #[test]
    fn test_submit_rejects_unknown_entity() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        let ghost = EntityId::from_raw(u64::MAX);
        assert_eq!(
            arena.submit(ghost, Intent::IDLE),
            Err(ArenaError::UnknownEntity(ghost))
        );
    }

    #[test]
    fn test_intents_are_consumed_once() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        run(&mut arena, 120);
        let id = arena.ids()[0];
        let x = arena.entity(id).expect("spawned").position().x;

        arena
            .submit(id, Intent::walk(Horizontal::Right))
            .expect("known entity");
        run(&mut arena, 1);
        run(&mut arena, 1);

        let e = arena.entity(id).expect("spawned");
        assert_eq!(e.position().x, x + 5.0);
        assert_eq!(e.velocity().x, 0.0);
    }

    #[test]
    fn test_jump_emits_sound_through_queue() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        run(&mut arena, 120);
        let _ = arena.sounds_mut().drain().count();

        let id = arena.ids()[1];
        arena.submit(id, Intent::IDLE.with_jump()).expect("known entity");
        run(&mut arena, 1);

        let mut played: Vec<SoundId> = Vec::new();
        assert_eq!(arena.dispatch_sounds(&mut played), 1);
        assert_eq!(played, vec![SoundId::Jump]);
    }

    #[test]
    fn test_boss_fight_setup() {
        let arena = Arena::boss_fight(VIEWPORT).expect("valid preset");
        let bosses: Vec<_> = arena
            .entities()
            .iter()
            .filter(|e| e.kind() == EntityKind::Boss)
            .collect();
        assert_eq!(bosses.len(), 2);
        assert!(bosses.iter().all(|b| b.controller().is_ai()));
        assert_eq!(arena.level().gravity(), 0.8);
    }

    #[test]
    fn test_victory_when_bosses_die() {
        let mut arena = Arena::boss_fight(VIEWPORT).expect("valid preset");
        for e in &mut arena.entities {
            if e.kind() == EntityKind::Boss {
                e.die(Millis::ZERO);
            }
        }
        let report = arena.step(Millis::ZERO);
        assert_eq!(report.status, MatchStatus::Victory);
    }

    #[test]
    fn test_defeat_when_hero_dies() {
        let mut arena = Arena::boss_fight(VIEWPORT).expect("valid preset");
        for e in &mut arena.entities {
            if e.kind() == EntityKind::Fighter {
                e.die(Millis::ZERO);
            }
        }
        assert_eq!(arena.step(Millis::ZERO).status, MatchStatus::Defeat);
    }

    #[test]
    fn test_duel_never_ends_on_its_own() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        arena.entities[0].die(Millis::ZERO);
        assert_eq!(arena.step(Millis::ZERO).status, MatchStatus::Ongoing);
    }

    #[test]
    fn test_camera_centers_between_duelists() {
        let arena = Arena::duel(VIEWPORT).expect("valid preset");
        // Fighters at x 300 and 700, 80 wide: midpoint 540.
        assert_eq!(arena.camera().offset().x, 40.0);
    }

    #[test]
    fn test_autopilot_hands_fighters_to_brains() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        arena.enable_autopilot();
        assert!(arena.entities().iter().all(|e| e.controller().is_ai()));
        run(&mut arena, 600);
        assert_eq!(arena.tick_count(), 600);
    }

    #[test]
    fn test_autopilot_fighters_do_not_escalate() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        arena.enable_autopilot();
        let id = arena.ids()[0];
        let fighter = arena.entity_mut(id).expect("spawned");
        fighter.take_damage(75, Millis::ZERO);
        assert_eq!(fighter.moveset().attack.damage, 10);
        assert_eq!(fighter.moveset().speed, 5.0);
    }

    #[test]
    fn test_replaced_level_takes_effect_next_step() {
        let mut arena = Arena::duel(VIEWPORT).expect("valid preset");
        run(&mut arena, 120);
        let settled: Vec<f32> = arena.entities().iter().map(|e| e.position().y).collect();

        let empty = Level::new(Vec::new(), 0.5, GroundProbe::default()).expect("valid level");
        arena.replace_level(empty);
        assert!(arena.level().platforms().is_empty());
        run(&mut arena, 10);

        for (e, y) in arena.entities().iter().zip(settled) {
            assert!(!e.is_grounded());
            assert!(e.position().y > y);
        }
    }
}
