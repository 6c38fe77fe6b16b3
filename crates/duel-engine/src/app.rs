//! Headless match runner.
//!
//! Builds the configured arena, steps it on a fixed clock until the match
//! is decided or the tick budget runs out, and reports a summary.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use duel_common::{Clock, DuelResult, EntityId};
use duel_gameplay::{ActionState, Arena, Entity, EntityKind, MatchStatus, Scenario, SoundDispatcher, SoundId};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::timing::{FixedStep, Pacer};

/// Sound sink that logs cues and counts them.
#[derive(Debug, Default)]
pub struct LoggingDispatcher {
    played: HashMap<SoundId, usize>,
}

impl LoggingDispatcher {
    /// Counts keyed by cue name, in a stable order.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        self.played.iter().map(|(sound, n)| (sound.name(), *n)).collect()
    }
}

impl SoundDispatcher for LoggingDispatcher {
    fn play(&mut self, sound: SoundId) {
        trace!("Sound: {}", sound.name());
        *self.played.entry(sound).or_default() += 1;
    }
}

/// Final state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    /// Entity ID
    pub id: EntityId,
    /// Display name
    pub name: String,
    /// Kind
    pub kind: EntityKind,
    /// Remaining health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Presented state
    pub state: ActionState,
    /// Top-left corner
    pub position: [f32; 2],
}

impl From<&Entity> for EntitySummary {
    fn from(entity: &Entity) -> Self {
        let position = entity.position();
        Self {
            id: entity.id(),
            name: entity.name().to_string(),
            kind: entity.kind(),
            health: entity.health(),
            max_health: entity.max_health(),
            state: entity.state(),
            position: [position.x, position.y],
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    /// Scenario played
    pub scenario: Scenario,
    /// Ticks actually run
    pub ticks: u64,
    /// Match status at the end
    pub status: MatchStatus,
    /// Hits landed, blocked ones included
    pub hits: usize,
    /// Hits taken on the guard
    pub blocked: usize,
    /// Sound cues played, by name
    pub sounds: BTreeMap<&'static str, usize>,
    /// Final entity states
    pub entities: Vec<EntitySummary>,
}

/// Builds the arena described by the configuration.
pub fn build_arena(config: &EngineConfig) -> DuelResult<Arena> {
    let viewport = config.viewport();
    let mut arena = match config.scenario {
        Scenario::Duel => Arena::duel_with(viewport, &config.fighter())?,
        Scenario::BossFight => Arena::boss_fight_with(viewport, &config.adventurer(), &config.boss())?,
    };

    if config.autopilot {
        arena.enable_autopilot();
    }
    info!(
        "Arena ready: {:?} with {} entities{}",
        config.scenario,
        arena.entities().len(),
        if config.autopilot { " on autopilot" } else { "" }
    );
    Ok(arena)
}

/// Steps an arena until the match is decided or `max_ticks` have run.
pub fn run_arena(
    arena: &mut Arena,
    max_ticks: u64,
    pacer: Option<&Pacer>,
    dispatcher: &mut LoggingDispatcher,
) -> (u64, usize, usize) {
    let mut clock = FixedStep::new();
    let (mut hits, mut blocked) = (0, 0);

    while clock.tick() < max_ticks {
        if let Some(pacer) = pacer {
            pacer.wait_for(&clock);
        }

        let report = arena.step(clock.now());
        clock.advance();
        arena.dispatch_sounds(dispatcher);

        for hit in &report.hits {
            debug!(
                "Tick {}: {} -> {} for {}{}",
                report.tick,
                hit.attacker,
                hit.defender,
                hit.outcome.dealt(),
                if hit.blocked { " (blocked)" } else { "" }
            );
        }
        hits += report.hits.len();
        blocked += report.hits.iter().filter(|hit| hit.blocked).count();

        if report.status != MatchStatus::Ongoing {
            info!("Match decided at tick {}: {:?}", report.tick, report.status);
            break;
        }
    }

    (clock.tick(), hits, blocked)
}

/// Runs a whole match headless.
pub fn run_match(config: &EngineConfig) -> Result<MatchSummary> {
    let mut arena = build_arena(config).context("failed to build arena")?;
    let mut dispatcher = LoggingDispatcher::default();
    let pacer = config.realtime.then(Pacer::new);

    let (ticks, hits, blocked) = run_arena(&mut arena, config.ticks, pacer.as_ref(), &mut dispatcher);

    Ok(MatchSummary {
        scenario: config.scenario,
        ticks,
        status: arena.status(),
        hits,
        blocked,
        sounds: dispatcher.counts(),
        entities: arena.entities().iter().map(EntitySummary::from).collect(),
    })
}

/// Runs the configured match and prints its summary as JSON.
pub fn run(config: &EngineConfig) -> Result<()> {
    let summary = run_match(config)?;
    info!(
        "Ran {} ticks: {:?}, {} hits ({} blocked)",
        summary.ticks, summary.status, summary.hits, summary.blocked
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_common::Millis;

    fn short(scenario: Scenario, ticks: u64) -> EngineConfig {
        EngineConfig {
            scenario,
            ticks,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_dispatcher_counts_cues() {
        let mut dispatcher = LoggingDispatcher::default();
        dispatcher.play(SoundId::Jump);
        dispatcher.play(SoundId::Jump);
        dispatcher.play(SoundId::Hit);
        let counts = dispatcher.counts();
        assert_eq!(counts.get("jump"), Some(&2));
        assert_eq!(counts.get("hit"), Some(&1));
        assert!(!counts.contains_key("block"));
    }

    #[test]
    fn test_build_arena_applies_autopilot() {
        let arena = build_arena(&short(Scenario::Duel, 1)).expect("valid config");
        assert!(arena.entities().iter().all(|e| e.controller().is_ai()));

        let manual = EngineConfig {
            autopilot: false,
            ..short(Scenario::Duel, 1)
        };
        let arena = build_arena(&manual).expect("valid config");
        assert!(arena.entities().iter().all(|e| !e.controller().is_ai()));
    }

    #[test]
    fn test_build_arena_uses_overrides() {
        let mut fighter = duel_gameplay::MoveSet::duel_fighter();
        fighter.max_health = 250;
        let config = EngineConfig {
            fighter: Some(fighter),
            ..short(Scenario::Duel, 1)
        };
        let arena = build_arena(&config).expect("valid config");
        assert!(arena.entities().iter().all(|e| e.health() == 250));
    }

    #[test]
    fn test_autopilot_duel_keeps_fighter_tuning() {
        let mut arena = build_arena(&short(Scenario::Duel, 3_000)).expect("valid config");
        let mut dispatcher = LoggingDispatcher::default();
        run_arena(&mut arena, 3_000, None, &mut dispatcher);
        for e in arena.entities() {
            assert_eq!(e.moveset(), e.base_moveset());
        }
    }

    #[test]
    fn test_duel_runs_full_budget() {
        let summary = run_match(&short(Scenario::Duel, 300)).expect("match runs");
        assert_eq!(summary.ticks, 300);
        assert_eq!(summary.status, MatchStatus::Ongoing);
        assert_eq!(summary.entities.len(), 2);
        for e in &summary.entities {
            assert!((0..=e.max_health).contains(&e.health));
        }
    }

    #[test]
    fn test_decided_match_stops_early() {
        let mut arena = build_arena(&short(Scenario::BossFight, 10)).expect("valid config");
        let bosses: Vec<EntityId> = arena
            .entities()
            .iter()
            .filter(|e| e.kind() == EntityKind::Boss)
            .map(Entity::id)
            .collect();
        for id in bosses {
            if let Some(boss) = arena.entity_mut(id) {
                boss.die(Millis::ZERO);
            }
        }

        let mut dispatcher = LoggingDispatcher::default();
        let (ticks, hits, _) = run_arena(&mut arena, 100, None, &mut dispatcher);
        assert_eq!(ticks, 1);
        assert_eq!(hits, 0);
        assert_eq!(arena.status(), MatchStatus::Victory);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = run_match(&short(Scenario::BossFight, 5)).expect("match runs");
        let json = serde_json::to_value(&summary).expect("summary serializes");
        assert_eq!(json["scenario"], "boss_fight");
        assert_eq!(json["ticks"], 5);
        assert_eq!(json["entities"].as_array().map(Vec::len), Some(3));
    }
}
