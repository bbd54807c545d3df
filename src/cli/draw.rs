//! Sprite editing commands: draw and preview
//!
//! `draw` applies its operations in a fixed order: cell sets, erases, lines,
//! then tools, and saves once at the end.

use image::RgbaImage;
use std::path::Path;

use crate::config::CliOverrides;
use crate::editor::{Button, PixelEditor, Tool};
use crate::output::{preview_path, save_png};

use super::{CommandError, CommandResult, Context};

/// Operations requested on the command line.
pub struct DrawOps {
    pub set: Vec<(usize, usize)>,
    pub erase: Vec<(usize, usize)>,
    pub line: Vec<[usize; 4]>,
    pub tools: Vec<Tool>,
}

impl DrawOps {
    fn is_empty(&self) -> bool {
        self.set.is_empty() && self.erase.is_empty() && self.line.is_empty() && self.tools.is_empty()
    }

    fn points(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.set
            .iter()
            .chain(&self.erase)
            .copied()
            .chain(self.line.iter().flat_map(|l| [(l[0], l[1]), (l[2], l[3])]))
    }
}

/// Execute the draw command
pub fn run_draw(ctx: &Context, sprite: Option<usize>, colour: usize, ops: &DrawOps) -> CommandResult {
    if ops.is_empty() {
        return Err(CommandError::InvalidArgs(
            "nothing to draw; use --set, --erase, --line or --tool".to_string(),
        ));
    }

    let (mut store, mut storage) = ctx.open()?;
    let mut editor = PixelEditor::new(ctx.config.editor.cell_size);

    let project = store.require()?;
    let index = sprite.unwrap_or_else(|| project.selected_sprite_index());
    let target = project.sprites.get(index).ok_or_else(|| {
        CommandError::InvalidArgs(format!(
            "sprite {} does not exist (bank has {} sprites)",
            index,
            project.sprites.len()
        ))
    })?;
    let size = target.size();
    if let Some((x, y)) = ops.points().find(|&(x, y)| x >= size || y >= size) {
        return Err(CommandError::InvalidArgs(format!(
            "cell ({}, {}) is outside the {}x{} sprite",
            x, y, size, size
        )));
    }
    if colour >= project.palette.len() {
        return Err(CommandError::InvalidArgs(format!(
            "colour {} does not exist (palette has {} colours)",
            colour,
            project.palette.len()
        )));
    }

    editor.edit_sprite(&mut store, index)?;
    store.select_colour(colour)?;

    for &(x, y) in &ops.set {
        editor.paint(&mut store, x, y)?;
    }
    for &(x, y) in &ops.erase {
        editor.erase(&mut store, x, y)?;
    }
    for l in &ops.line {
        editor.stroke_line(&mut store, (l[0], l[1]), (l[2], l[3]), Button::Primary)?;
    }
    for &tool in &ops.tools {
        editor.apply_tool(&mut store, tool)?;
    }

    store.save_to(&mut storage)?;

    let name = store.require()?.sprites.get(index).map(|s| s.name().to_string()).unwrap_or_default();
    println!("Updated sprite {} \"{}\"", index, name);
    Ok(())
}

/// Execute the preview command
pub fn run_preview(
    mut ctx: Context,
    overrides: &CliOverrides,
    sprite: Option<usize>,
    output: Option<&Path>,
) -> CommandResult {
    ctx.apply(overrides)?;
    let (mut store, _) = ctx.open()?;
    let mut editor = PixelEditor::new(ctx.config.editor.cell_size);

    if let Some(index) = sprite {
        let len = store.require()?.sprites.len();
        if index >= len {
            return Err(CommandError::InvalidArgs(format!(
                "sprite {} does not exist (bank has {} sprites)",
                index, len
            )));
        }
        // Selection is not saved; this only points the editor at the sprite
        editor.edit_sprite(&mut store, index)?;
    } else {
        editor.follow_selection(&store)?;
    }

    let project = store.require()?;
    let Some(target) = project.sprites.get(editor.sprite_index()) else {
        return Err(CommandError::Failed("sprite bank is empty".to_string()));
    };

    let side = target.size() as u32 * editor.cell_size();
    let mut view = RgbaImage::new(side, side);
    editor.render_view(&store, &mut view)?;

    let path = preview_path(target.name(), output);
    save_png(&view, &path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
