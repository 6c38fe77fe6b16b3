//! # Duel Engine
//!
//! Headless driver for the Duel combat core.
//!
//! Loads `duel.toml` (or the path given as the first argument), sets up the
//! configured scenario and runs it on a fixed 60 Hz clock, printing a JSON
//! summary when the match is decided or the tick budget runs out.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let loaded = EngineConfig::read(&path)?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    // Initialize tracing
    let filter = EnvFilter::from_default_env().add_directive(config.log_directive().parse()?);
    let (json, plain) = if config.json_logs {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };
    tracing_subscriber::registry()
        .with(json)
        .with(plain)
        .with(filter)
        .init();

    info!("Duel starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if !found {
        warn!("Config file {} not found, using defaults", path.display());
    }

    config.validate()?;
    app::run(&config)?;

    info!("Duel shutdown complete");
    Ok(())
}
