//! Subcommand handlers.
//!
//! `main.rs` parses arguments and dispatches here; each module owns one
//! subcommand. Shared loading of the run configuration and drawing lives in
//! this module.

pub mod graph;
pub mod inventory;
pub mod nearest;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use cableroute_lib::{default_config_path, DrawingSnapshot, RunConfig};

/// Load the run configuration.
///
/// An explicit `--config` path must exist. Without one, the platform default
/// location is used when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<RunConfig> {
    if let Some(path) = explicit {
        return RunConfig::from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()));
    }

    let path = default_config_path().context("failed to resolve the default config location")?;
    if path.is_file() {
        RunConfig::from_path(&path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))
    } else {
        info!(path = %path.display(), "no configuration file found, using defaults");
        Ok(RunConfig::default())
    }
}

pub fn load_drawing(path: &Path) -> Result<DrawingSnapshot> {
    DrawingSnapshot::from_path(path)
        .with_context(|| format!("failed to load drawing from {}", path.display()))
}
