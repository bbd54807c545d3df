//! Sprite bank commands

use clap::Subcommand;

use super::{CommandError, CommandResult, Context};

#[derive(Subcommand)]
pub enum SpriteAction {
    /// Print a sprite's cells (`.` marks empty cells)
    Show {
        /// Sprite index (defaults to the selected sprite)
        index: Option<usize>,
    },
    /// Make a sprite the selected one
    Select { index: usize },
    /// Rename a sprite
    Rename { index: usize, name: String },
    /// Copy one sprite's cells and name over another
    Copy { from: usize, to: usize },
}

/// Execute a sprite subcommand
pub fn run_sprite(ctx: &Context, action: SpriteAction) -> CommandResult {
    let (mut store, mut storage) = ctx.open()?;

    match action {
        SpriteAction::Show { index } => {
            let project = store.require()?;
            let index = index.unwrap_or_else(|| project.selected_sprite_index());
            let sprite = project.sprites.get(index).ok_or_else(|| {
                CommandError::InvalidArgs(format!(
                    "sprite {} does not exist (bank has {} sprites)",
                    index,
                    project.sprites.len()
                ))
            })?;
            let width = project.palette.len().saturating_sub(1).to_string().len();
            println!("{} \"{}\" ({}x{})", index, sprite.name(), sprite.size(), sprite.size());
            for row in sprite.data() {
                let cells: Vec<String> = row
                    .iter()
                    .map(|cell| {
                        let text = cell.map_or_else(|| ".".to_string(), |i| i.to_string());
                        format!("{:>width$}", text, width = width)
                    })
                    .collect();
                println!("{}", cells.join(" "));
            }
            return Ok(());
        }
        SpriteAction::Select { index } => {
            store.select_sprite(index)?;
            println!("Selected sprite {}", index);
        }
        SpriteAction::Rename { index, name } => {
            store.rename_sprite(index, &name)?;
            println!("Sprite {} renamed to \"{}\"", index, name);
        }
        SpriteAction::Copy { from, to } => {
            store.copy_sprite_data(from, to)?;
            println!("Copied sprite {} over sprite {}", from, to);
        }
    }

    store.save_to(&mut storage)?;
    Ok(())
}
