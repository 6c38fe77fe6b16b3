//! Combat arbitration.
//!
//! Runs after every entity has finished its tick. Hits are first collected
//! against the finalized positions, guards and hitboxes, then applied, so the
//! outcome does not depend on entity order. A swing that lands is closed
//! immediately: one activation window damages each defender at most once.

use duel_common::{EntityId, Millis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::SwingKind;
use crate::entity::{DamageOutcome, Entity, Facing};
use crate::sound::{SoundId, SoundQueue};

/// A hit found during collection, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingHit {
    /// Index of the attacker
    pub attacker: usize,
    /// Index of the defender
    pub defender: usize,
    /// Weight of the swing
    pub kind: SwingKind,
    /// Damage after mitigation
    pub damage: i32,
    /// Whether the defender's guard took the hit
    pub blocked: bool,
    /// Knockback direction, the attacker's facing
    pub direction: Facing,
    /// Knockback force
    pub force: f32,
}

/// An applied hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitReport {
    /// Who swung
    pub attacker: EntityId,
    /// Who was hit
    pub defender: EntityId,
    /// Whether the swing was heavy
    pub heavy: bool,
    /// Whether the defender's guard took the hit
    pub blocked: bool,
    /// What the damage did
    pub outcome: DamageOutcome,
}

/// Damage that passes through a guard.
#[must_use]
pub fn mitigate(damage: i32, factor: f32) -> i32 {
    (damage as f32 * factor).round() as i32
}

/// Finds every attacker/defender pair whose live hitbox overlaps a body.
#[must_use]
pub fn collect_hits(entities: &[Entity]) -> Vec<PendingHit> {
    let mut hits = Vec::new();

    for (ai, attacker) in entities.iter().enumerate() {
        if !attacker.is_in_play() {
            continue;
        }
        let (Some(hitbox), Some(swing)) = (attacker.hitbox(), attacker.swing()) else {
            continue;
        };

        for (di, defender) in entities.iter().enumerate() {
            if ai == di || defender.team() == attacker.team() || !defender.is_in_play() || defender.is_evading() {
                continue;
            }
            if !hitbox.overlaps(&defender.rect()) {
                continue;
            }

            let blocked = defender.guards_against(attacker.center().x);
            let damage = if blocked {
                mitigate(swing.damage, defender.moveset().block_factor)
            } else {
                swing.damage
            };
            hits.push(PendingHit {
                attacker: ai,
                defender: di,
                kind: swing.kind,
                damage,
                blocked,
                direction: attacker.facing(),
                force: swing.knockback,
            });
        }
    }

    hits
}

/// Applies collected hits and closes the swings that landed.
pub fn apply_hits(entities: &mut [Entity], hits: &[PendingHit], now: Millis, sounds: &mut SoundQueue) -> Vec<HitReport> {
    let mut reports = Vec::with_capacity(hits.len());

    for hit in hits {
        let attacker_id = entities[hit.attacker].id();
        let defender = &mut entities[hit.defender];
        let outcome = defender.take_damage(hit.damage, now);

        if outcome != DamageOutcome::Ignored {
            if hit.blocked {
                sounds.push(SoundId::Block);
            } else {
                defender.knockback(hit.direction, hit.force);
                sounds.push(SoundId::Hit);
                sounds.push(match hit.kind {
                    SwingKind::Light => SoundId::Attack,
                    SwingKind::Heavy => SoundId::HeavyAttack,
                });
            }
        }

        debug!(
            "{} hits {} for {} ({}, {:?})",
            attacker_id,
            defender.id(),
            hit.damage,
            if hit.blocked { "blocked" } else { "clean" },
            outcome
        );
        reports.push(HitReport {
            attacker: attacker_id,
            defender: defender.id(),
            heavy: hit.kind == SwingKind::Heavy,
            blocked: hit.blocked,
            outcome,
        });
    }

    for hit in hits {
        entities[hit.attacker].end_swing();
    }

    reports
}

/// Collects and applies every hit of this tick.
pub fn arbitrate(entities: &mut [Entity], now: Millis, sounds: &mut SoundQueue) -> Vec<HitReport> {
    let hits = collect_hits(entities);
    if hits.is_empty() {
        return Vec::new();
    }
    apply_hits(entities, &hits, now, sounds)
}
