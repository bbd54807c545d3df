//! Tile map commands

use clap::Subcommand;
use std::path::PathBuf;

use crate::models::EMPTY_TILE;
use crate::output::{save_png, scale_image};

use super::{CommandResult, Context};

#[derive(Subcommand)]
pub enum MapAction {
    /// Print the map grid (`.` marks empty cells)
    Show,
    /// Render the map to PNG using sprite thumbnails
    Render {
        /// Output file
        #[arg(short, long, default_value = "map.png")]
        output: PathBuf,

        /// Integer upscale factor (nearest neighbour)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,
    },
    /// Point a map cell at a sprite
    Place {
        /// Cell index (row-major)
        cell: usize,
        /// Sprite index
        sprite: usize,
    },
    /// Empty a map cell
    Clear {
        /// Cell index (row-major)
        cell: usize,
    },
    /// Empty every map cell
    ClearAll,
}

/// Execute a map subcommand
pub fn run_map(ctx: &Context, action: MapAction) -> CommandResult {
    let (mut store, mut storage) = ctx.open()?;

    match action {
        MapAction::Show => {
            let map = &store.require()?.map;
            let width = map.cells().iter().map(|c| c.to_string().len()).max().unwrap_or(1);
            for row in map.cells().chunks(map.width().max(1)) {
                let line: Vec<String> = row
                    .iter()
                    .map(|&c| {
                        let text = if c == EMPTY_TILE { ".".to_string() } else { c.to_string() };
                        format!("{:>width$}", text, width = width)
                    })
                    .collect();
                println!("{}", line.join(" "));
            }
            return Ok(());
        }
        MapAction::Render { output, scale } => {
            let image = scale_image(store.render_map()?, scale);
            save_png(&image, &output)?;
            println!("Wrote {}", output.display());
            return Ok(());
        }
        MapAction::Place { cell, sprite } => {
            store.place_tile(cell, sprite)?;
            println!("Cell {} -> sprite {}", cell, sprite);
        }
        MapAction::Clear { cell } => {
            store.clear_tile(cell)?;
            println!("Cell {} cleared", cell);
        }
        MapAction::ClearAll => {
            store.clear_map()?;
            println!("Map cleared");
        }
    }

    store.save_to(&mut storage)?;
    Ok(())
}
