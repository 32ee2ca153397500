//! Map check command

use super::{load_game, OutputFormat};
use anyhow::Result;

pub fn run(map: &str, config: Option<&str>, format: OutputFormat) -> Result<()> {
    let (game, summary) = load_game(map, config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            println!("Map '{}' is valid", map);
            println!("  bitmaps:  {}", summary.bitmaps);
            println!("  shapes:   {}", summary.shapes);
            println!("  patterns: {}", summary.patterns);
            println!("  entities: {} ({} players)", summary.entities, summary.players);
            let controllers = game.input.controller_count();
            if summary.players > controllers {
                println!(
                    "  warning: {} players but only {} controllers configured",
                    summary.players, controllers
                );
            }
        }
    }

    Ok(())
}
