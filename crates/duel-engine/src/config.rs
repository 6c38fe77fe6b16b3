//! Engine configuration.
//!
//! Match setup, run length and logging are read from a TOML file. Every
//! field has a default, so a partial file (or none at all) is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use duel_common::TICK_RATE;
use duel_gameplay::{MoveSet, Scenario};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Configuration file name.
pub const CONFIG_FILE: &str = "duel.toml";

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The simulation only runs at its fixed tick rate
    #[error("tick rate must be {TICK_RATE} Hz, got {0}")]
    TickRate(u32),

    /// A tuning value is out of range
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Simulation ===
    /// Ticks per second. Only the fixed rate is accepted.
    pub tick_rate: u32,
    /// Maximum ticks to run before stopping
    pub ticks: u64,
    /// Match to set up
    pub scenario: Scenario,
    /// Hand every fighter to a brain
    pub autopilot: bool,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,

    // === View ===
    /// Viewport width in world units
    pub viewport_width: f32,
    /// Viewport height in world units
    pub viewport_height: f32,

    // === Logging ===
    /// Extra `tracing` filter directive, e.g. `duel_gameplay=debug`
    pub log_filter: Option<String>,
    /// Emit JSON log lines
    pub json_logs: bool,

    // === Tuning overrides ===
    /// Duel fighter tuning
    pub fighter: Option<MoveSet>,
    /// Boss-fight hero tuning
    pub adventurer: Option<MoveSet>,
    /// Boss tuning
    pub boss: Option<MoveSet>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            ticks: 3_600, // one minute
            scenario: Scenario::Duel,
            autopilot: true,
            realtime: false,

            viewport_width: 1000.0,
            viewport_height: 600.0,

            log_filter: None,
            json_logs: false,

            fighter: None,
            adventurer: None,
            boss: None,
        }
    }
}

impl EngineConfig {
    /// Reads a configuration file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            },
        };

        let config: Self = toml::from_str(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Checks values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate != TICK_RATE {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        let viewport = self.viewport();
        if !(viewport.x > 0.0 && viewport.y > 0.0 && viewport.is_finite()) {
            return Err(ConfigError::InvalidTuning(format!(
                "viewport must be positive, got {}x{}",
                viewport.x, viewport.y
            )));
        }

        let overrides = [
            ("fighter", &self.fighter),
            ("adventurer", &self.adventurer),
            ("boss", &self.boss),
        ];
        for (name, moveset) in overrides {
            if let Some(moveset) = moveset {
                if !moveset.is_valid() {
                    return Err(ConfigError::InvalidTuning(format!(
                        "{name} needs positive health and size and a finite speed"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Duel fighter tuning, with any override applied.
    #[must_use]
    pub fn fighter(&self) -> MoveSet {
        self.fighter.clone().unwrap_or_else(MoveSet::duel_fighter)
    }

    /// Boss-fight hero tuning, with any override applied.
    #[must_use]
    pub fn adventurer(&self) -> MoveSet {
        self.adventurer.clone().unwrap_or_else(MoveSet::adventurer)
    }

    /// Boss tuning, with any override applied.
    #[must_use]
    pub fn boss(&self) -> MoveSet {
        self.boss.clone().unwrap_or_else(MoveSet::boss)
    }

    /// Filter directive for the log subscriber.
    #[must_use]
    pub fn log_directive(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("duel=info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_gameplay::EntityKind;
    use tempfile::TempDir;

    fn write(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, contents).expect("Failed to write config");
        path
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.scenario, Scenario::Duel);
        assert_eq!(config.viewport(), Vec2::new(1000.0, 600.0));
        assert_eq!(config.log_directive(), "duel=info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("absent.toml");
        assert!(EngineConfig::read(path).expect("missing file is not an error").is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&temp_dir, "scenario = \"boss_fight\"\nticks = 120\n");

        let config = EngineConfig::read(path)
            .expect("valid config")
            .expect("file exists");
        assert_eq!(config.scenario, Scenario::BossFight);
        assert_eq!(config.ticks, 120);
        assert_eq!(config.tick_rate, 60);
        assert!(config.autopilot);
    }

    #[test]
    fn test_moveset_override_merges_with_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&temp_dir, "[fighter]\nmax_health = 150\nspeed = 6.0\n");

        let config = EngineConfig::read(path)
            .expect("valid config")
            .expect("file exists");
        let fighter = config.fighter();
        assert_eq!(fighter.max_health, 150);
        assert_eq!(fighter.speed, 6.0);
        assert_eq!(fighter.kind, EntityKind::Fighter);
        assert_eq!(config.boss(), MoveSet::boss());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = write(&temp_dir, "ticks = \"many\"");
        assert!(matches!(EngineConfig::read(path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_other_tick_rates() {
        let config = EngineConfig {
            tick_rate: 144,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TickRate(144))));
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let mut boss = MoveSet::boss();
        boss.max_health = 0;
        let config = EngineConfig {
            boss: Some(boss),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTuning(_))));

        let config = EngineConfig {
            viewport_width: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTuning(_))));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = EngineConfig {
            scenario: Scenario::BossFight,
            log_filter: Some("duel_gameplay=debug".to_string()),
            ..EngineConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
        assert!(toml_str.contains("tick_rate"));

        let parsed: EngineConfig = toml::from_str(&toml_str).expect("Failed to parse");
        assert_eq!(parsed, config);
        assert_eq!(parsed.log_directive(), "duel_gameplay=debug");
    }
}
