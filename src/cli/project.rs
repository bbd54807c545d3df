//! Whole-project commands: new, info, import, export-project, erase, transparent

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::CliOverrides;
use crate::models::Project;
use crate::storage::{KeyValueStore, PROJECT_KEY};

use super::{CommandError, CommandResult, Context};

/// Summary printed by `pixed info`.
#[derive(Debug, Serialize)]
struct ProjectInfo {
    size: usize,
    sprites: usize,
    selected: usize,
    selected_name: Option<String>,
    palette: Vec<String>,
    map_width: usize,
    map_height: usize,
    placed_tiles: usize,
    stale_tiles: Vec<usize>,
    transparent: bool,
}

impl ProjectInfo {
    fn from_project(project: &Project) -> Self {
        Self {
            size: project.size,
            sprites: project.sprites.len(),
            selected: project.selected_sprite_index(),
            selected_name: project.sprites.selected().map(|s| s.name().to_string()),
            palette: project.palette.colours().iter().map(|c| c.to_string()).collect(),
            map_width: project.map.width(),
            map_height: project.map.height(),
            placed_tiles: project.map.cells().iter().filter(|&&c| c >= 0).count(),
            stale_tiles: project.map.stale_cells(project.sprites.len()),
            transparent: project.transparent,
        }
    }
}

/// Execute the new command
pub fn run_new(mut ctx: Context, overrides: &CliOverrides, force: bool) -> CommandResult {
    ctx.apply(overrides)?;

    let mut storage = ctx.storage();
    if !force && storage.get(PROJECT_KEY)?.is_some() {
        return Err(CommandError::Failed(format!(
            "a project already exists in {} (use --force to replace it)",
            storage.root().display()
        )));
    }

    let settings = ctx.config.new_project_settings();
    let mut store = ctx.empty_store();
    store.new_project(&settings, &mut rand::thread_rng());
    store.save_to(&mut storage)?;

    println!(
        "Created project: {} sprites of {}x{}, {} colours, {}x{} map",
        settings.bank_size,
        settings.sprite_size,
        settings.sprite_size,
        settings.palette_size,
        settings.map_width,
        settings.map_height
    );
    Ok(())
}

/// Execute the info command
pub fn run_info(ctx: &Context, json: bool) -> CommandResult {
    let (store, _) = ctx.open()?;
    let info = ProjectInfo::from_project(store.require()?);

    if json {
        let out = serde_json::to_string_pretty(&info)
            .map_err(|e| CommandError::Failed(format!("cannot serialize info: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    println!("Sprite size: {}x{}", info.size, info.size);
    match &info.selected_name {
        Some(name) => println!("Sprites:     {} (selected: {} \"{}\")", info.sprites, info.selected, name),
        None => println!("Sprites:     {}", info.sprites),
    }
    println!("Palette:     {} colours", info.palette.len());
    println!(
        "Map:         {}x{}, {} placed",
        info.map_width, info.map_height, info.placed_tiles
    );
    if !info.stale_tiles.is_empty() {
        println!("             {} cells reference missing sprites", info.stale_tiles.len());
    }
    println!("Transparent: {}", if info.transparent { "on" } else { "off" });
    Ok(())
}

/// Execute the import command
pub fn run_import(ctx: &Context, file: &Path) -> CommandResult {
    let text = fs::read_to_string(file)
        .map_err(|source| CommandError::Io { path: file.to_path_buf(), source })?;

    let mut storage = ctx.storage();
    let mut store = ctx.empty_store();
    store.import_into(&mut storage, &text)?;

    let project = store.require()?;
    println!("Imported {} sprites from {}", project.sprites.len(), file.display());
    Ok(())
}

/// Execute the export-project command
pub fn run_export_project(ctx: &Context, output: Option<&Path>) -> CommandResult {
    let (store, _) = ctx.open()?;
    let json = store.to_json(ctx.config.export.pretty)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|source| CommandError::Io { path: parent.to_path_buf(), source })?;
            }
            fs::write(path, json)
                .map_err(|source| CommandError::Io { path: path.to_path_buf(), source })?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Execute the erase command
pub fn run_erase(ctx: &Context, yes: bool) -> CommandResult {
    if !yes {
        return Err(CommandError::InvalidArgs(
            "erasing deletes the stored project; pass --yes to confirm".to_string(),
        ));
    }

    let mut storage = ctx.storage();
    let mut store = ctx.empty_store();
    store.erase(&mut storage)?;
    println!("Erased project in {}", storage.root().display());
    Ok(())
}

/// Execute the transparent command
pub fn run_transparent(ctx: &Context, on: bool) -> CommandResult {
    let (mut store, mut storage) = ctx.open()?;
    store.set_transparent(on)?;
    store.save_to(&mut storage)?;
    println!("Transparency {}", if on { "on" } else { "off" });
    Ok(())
}
