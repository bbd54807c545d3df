//! Palette commands

use clap::Subcommand;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::color::Colour;

use super::{CommandError, CommandResult, Context};

#[derive(Subcommand)]
pub enum PaletteAction {
    /// List the palette colours
    Show {
        /// Print the bulk-edit text (one RRGGBB per line) instead
        #[arg(long)]
        bulk: bool,
    },
    /// Set one colour
    Set {
        /// Palette index
        index: usize,
        /// Colour as #RRGGBB
        colour: String,
    },
    /// Apply bulk-edit text: line N replaces colour N
    Edit {
        /// File with one colour per line, or `-` for stdin
        file: PathBuf,
    },
}

/// Execute a palette subcommand
pub fn run_palette(ctx: &Context, action: PaletteAction) -> CommandResult {
    match action {
        PaletteAction::Show { bulk } => {
            let (store, _) = ctx.open()?;
            let palette = &store.require()?.palette;
            if bulk {
                println!("{}", palette.encode_bulk_text());
            } else {
                for (i, colour) in palette.colours().iter().enumerate() {
                    println!("{:>3}  {}", i, colour);
                }
            }
            Ok(())
        }
        PaletteAction::Set { index, colour } => {
            let colour: Colour = colour
                .parse()
                .map_err(|e| CommandError::InvalidArgs(format!("{}", e)))?;
            let (mut store, mut storage) = ctx.open()?;
            store.set_colour(index, colour)?;
            store.save_to(&mut storage)?;
            println!("Colour {} set to {}", index, colour);
            Ok(())
        }
        PaletteAction::Edit { file } => {
            let text = read_input(&file)?;
            let (mut store, mut storage) = ctx.open()?;
            let result = store.decode_palette_text(&text)?;
            for sub in &result.substituted {
                eprintln!(
                    "Warning: line {}: '{}' is not a valid colour, using #000000",
                    sub.index + 1,
                    sub.input
                );
            }
            store.save_to(&mut storage)?;
            println!("Updated {} colours", result.updated.len());
            Ok(())
        }
    }
}

fn read_input(file: &Path) -> Result<String, CommandError> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CommandError::Io { path: file.to_path_buf(), source })?;
        Ok(text)
    } else {
        fs::read_to_string(file).map_err(|source| CommandError::Io { path: file.to_path_buf(), source })
    }
}
