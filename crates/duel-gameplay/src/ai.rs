//! Controllers and the boss brain.
//!
//! Every entity owns a [`Controller`]. A manual controller passes through
//! whatever intent the driver submitted; a brain replaces it with its own
//! decision, reading only a snapshot of its target's position.

use duel_common::SimDuration;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::intent::{Horizontal, Intent};
use crate::timers::Cooldown;

/// Tuning of the [`BruteBrain`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BruteTuning {
    /// Ticks between patrol direction reversals
    pub patrol_interval: u32,
    /// Horizontal distance under which the target is engaged
    pub attack_range: f32,
    /// Minimum time between attack decisions
    pub attack_interval: SimDuration,
    /// Health fractions under which the next phase starts, in order
    pub phase_thresholds: [f32; 2],
    /// Walking speed gained per phase
    pub speed_step: f32,
    /// Attack damage gained per phase
    pub damage_step: i32,
    /// Whether falling health unlocks phases at all
    pub escalates: bool,
}

impl Default for BruteTuning {
    fn default() -> Self {
        Self {
            patrol_interval: 60,
            attack_range: 200.0,
            attack_interval: SimDuration::Ticks(90),
            phase_thresholds: [0.6, 0.3],
            speed_step: 1.0,
            damage_step: 10,
            escalates: true,
        }
    }
}

impl BruteTuning {
    /// Tuning for fighters handed to a brain: same behaviour, no phases.
    #[must_use]
    pub fn autopilot() -> Self {
        Self {
            escalates: false,
            ..Self::default()
        }
    }
}

/// Phase escalation reported by [`BruteBrain::escalate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    /// Phase now in effect, starting at 0
    pub phase: u8,
    /// Walking speed to add
    pub speed_bonus: f32,
    /// Attack damage to add
    pub damage_bonus: i32,
}

/// Patrol-and-swing brain used by bosses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BruteBrain {
    tuning: BruteTuning,
    patrol: Horizontal,
    patrol_ticks: u32,
    attack_cooldown: Cooldown,
    phase: u8,
}

impl Default for BruteBrain {
    fn default() -> Self {
        Self::new(BruteTuning::default())
    }
}

impl BruteBrain {
    /// Creates a brain patrolling to the right.
    #[must_use]
    pub fn new(tuning: BruteTuning) -> Self {
        Self {
            tuning,
            patrol: Horizontal::Right,
            patrol_ticks: 0,
            attack_cooldown: Cooldown::READY,
            phase: 0,
        }
    }

    /// Current phase, starting at 0.
    #[must_use]
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Tuning in use.
    #[must_use]
    pub fn tuning(&self) -> &BruteTuning {
        &self.tuning
    }

    /// Forgets patrol progress, attack timing and phase.
    pub fn reset(&mut self) {
        *self = Self::new(self.tuning);
    }

    /// Decides this tick's intent.
    ///
    /// `center_x` is the brain's own body center; `target` is the center of
    /// the nearest opponent, if any is alive.
    pub fn think(&mut self, center_x: f32, target: Option<Vec2>) -> Intent {
        self.attack_cooldown.tick();

        if let Some(target) = target {
            if (target.x - center_x).abs() < self.tuning.attack_range {
                let mut intent = Intent::walk(Horizontal::toward(center_x, target.x));
                if self.attack_cooldown.is_ready() {
                    intent.attack = true;
                    self.attack_cooldown.start(self.tuning.attack_interval);
                }
                return intent;
            }
        }

        self.patrol_ticks += 1;
        if self.patrol_ticks >= self.tuning.patrol_interval {
            self.patrol_ticks = 0;
            self.patrol = match self.patrol {
                Horizontal::Left => Horizontal::Right,
                Horizontal::Right | Horizontal::Still => Horizontal::Left,
            };
        }
        Intent::walk(self.patrol)
    }

    /// Moves to a later phase when health has fallen past a threshold.
    pub fn escalate(&mut self, health_fraction: f32) -> Option<PhaseChange> {
        if !self.tuning.escalates {
            return None;
        }
        let reached = self
            .tuning
            .phase_thresholds
            .iter()
            .filter(|&&threshold| health_fraction < threshold)
            .count() as u8;
        if reached <= self.phase {
            return None;
        }

        let steps = reached - self.phase;
        self.phase = reached;
        Some(PhaseChange {
            phase: reached,
            speed_bonus: self.tuning.speed_step * f32::from(steps),
            damage_bonus: self.tuning.damage_step * i32::from(steps),
        })
    }
}

/// Source of an entity's intents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Intents come from the driver
    #[default]
    Manual,
    /// Intents come from a brain
    Brute(BruteBrain),
}

impl Controller {
    /// Whether intents are decided by a brain.
    #[must_use]
    pub fn is_ai(&self) -> bool {
        !matches!(self, Self::Manual)
    }

    /// Resolves the intent for this tick.
    pub fn decide(&mut self, submitted: Intent, center_x: f32, target: Option<Vec2>) -> Intent {
        match self {
            Self::Manual => submitted,
            Self::Brute(brain) => brain.think(center_x, target),
        }
    }

    /// Returns a brain to its initial state. No-op for manual control.
    pub fn reset(&mut self) {
        if let Self::Brute(brain) = self {
            brain.reset();
        }
    }
}
