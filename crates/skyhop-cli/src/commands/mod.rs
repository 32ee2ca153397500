//! CLI command implementations

pub mod check;
pub mod simulate;

use anyhow::{Context, Result};
use clap::ValueEnum;
use skyhop_runtime::{GameConfig, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Default config, or the one at `path`
fn load_config(path: Option<&str>) -> Result<GameConfig> {
    match path {
        Some(path) => {
            GameConfig::load(path).with_context(|| format!("Failed to load config '{}'", path))
        }
        None => Ok(GameConfig::default()),
    }
}

/// A fresh game with `map` loaded
fn load_game(map: &str, config: Option<&str>) -> Result<(GameState, skyhop_scene::MapSummary)> {
    let config = load_config(config)?;
    let mut game = GameState::new(config).context("Failed to set up game state")?;
    let summary = game
        .load_map(map)
        .with_context(|| format!("Failed to load map '{}'", map))?;
    Ok((game, summary))
}
