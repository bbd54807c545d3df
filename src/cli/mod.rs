//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations. Every command works on the project
//! slot inside the configured storage directory.

mod draw;
mod export;
mod map;
mod palette;
mod project;
mod sprite;

use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

use crate::config::{
    default_config, load_config, locate_config, merge_cli_overrides, resolve_path, CliOverrides,
    ConfigError, PixedConfig,
};
use crate::editor::{EditorError, Tool};
use crate::export::ExportError;
use crate::output::OutputError;
use crate::storage::{DirectoryStore, StorageError};
use crate::store::{ProjectStore, StoreError};

pub use map::MapAction;
pub use palette::PaletteAction;
pub use sprite::SpriteAction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Pixed - sprite bank, palette and tile map editor
#[derive(Parser)]
#[command(name = "pixed")]
#[command(about = "Pixed - edit a sprite bank, palette and tile map, and export sprite sheets")]
#[command(version)]
pub struct Cli {
    /// Use this config file instead of discovering pixed.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project with a random palette and blank sprites
    New {
        /// Sprite edge length
        #[arg(long)]
        sprite_size: Option<usize>,

        /// Number of sprites
        #[arg(long)]
        bank_size: Option<usize>,

        /// Number of palette colours
        #[arg(long)]
        palette_size: Option<usize>,

        /// Replace an existing project
        #[arg(long)]
        force: bool,
    },

    /// Summarize the current project
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the project with a project document
    Import {
        /// Project document (JSON)
        file: PathBuf,
    },

    /// Write the project document
    ExportProject {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete the stored project
    Erase {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Export the sprite bank as a packed PNG sheet plus JSON metadata
    Export {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base file name of the sheet
        #[arg(long)]
        name: Option<String>,

        /// Sprites per row
        #[arg(long)]
        columns: Option<u32>,

        /// Write the metadata without indentation
        #[arg(long)]
        compact: bool,
    },

    /// Edit cells of a sprite
    Draw {
        /// Sprite index (defaults to the selected sprite)
        #[arg(long)]
        sprite: Option<usize>,

        /// Palette index to paint with
        #[arg(long, default_value = "0")]
        colour: usize,

        /// Paint a cell: --set X,Y
        #[arg(long = "set", value_parser = parse_point)]
        set: Vec<(usize, usize)>,

        /// Erase a cell: --erase X,Y
        #[arg(long = "erase", value_parser = parse_point)]
        erase: Vec<(usize, usize)>,

        /// Paint a line: --line X0,Y0,X1,Y1
        #[arg(long = "line", value_parser = parse_line)]
        line: Vec<[usize; 4]>,

        /// Whole-sprite tool (clear, flip-x, flip-y, recolor, up, down, left, right)
        #[arg(long = "tool")]
        tool: Vec<Tool>,
    },

    /// Render the editor view of a sprite to PNG
    Preview {
        /// Sprite index (defaults to the selected sprite)
        #[arg(long)]
        sprite: Option<usize>,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixels per cell
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=256))]
        cell_size: Option<u32>,
    },

    /// Inspect and edit the palette
    Palette {
        #[command(subcommand)]
        action: PaletteAction,
    },

    /// Inspect and edit the tile map
    Map {
        #[command(subcommand)]
        action: MapAction,
    },

    /// Select, rename and copy sprites
    Sprite {
        #[command(subcommand)]
        action: SpriteAction,
    },

    /// Render empty cells transparent instead of black
    Transparent {
        #[arg(value_enum)]
        state: Toggle,
    },
}

/// Failure of a command. Everything but `InvalidArgs` exits with 1.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    #[error("{0}")]
    InvalidArgs(String),
    #[error("{0}")]
    Failed(String),
    #[error("no project found in {0}; run `pixed new` first")]
    NoProject(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) type CommandResult = Result<(), CommandError>;

/// Print a failed command's error and map it to an exit code.
pub(crate) fn finish(result: CommandResult) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CommandError::InvalidArgs(msg)) => {
            eprintln!("Error: {}", msg);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Resolved configuration and the directory relative paths start from.
pub(crate) struct Context {
    pub config: PixedConfig,
    pub root: PathBuf,
    pub cwd: PathBuf,
}

impl Context {
    fn load(explicit: Option<&Path>) -> Result<Self, CommandError> {
        let cwd = env::current_dir()
            .map_err(|source| CommandError::Io { path: PathBuf::from("."), source })?;
        match locate_config(explicit, &cwd) {
            Some(location) => {
                let config = load_config(Some(&location.path))?;
                Ok(Self { config, root: location.root, cwd })
            }
            None => Ok(Self { config: default_config(), root: cwd.clone(), cwd }),
        }
    }

    /// Merge flags into the config. Paths given on the command line are
    /// relative to the working directory, not the config file.
    pub fn apply(&mut self, overrides: &CliOverrides) -> Result<(), CommandError> {
        let mut overrides = overrides.clone();
        overrides.out = overrides.out.map(|out| resolve_path(&self.cwd, &out));
        merge_cli_overrides(&mut self.config, &overrides)?;
        Ok(())
    }

    /// Resolve a config path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_path(&self.root, path)
    }

    pub fn storage(&self) -> DirectoryStore {
        DirectoryStore::new(self.resolve(&self.config.project.storage))
    }

    pub fn empty_store(&self) -> ProjectStore {
        ProjectStore::new(self.config.map.width, self.config.map.height)
    }

    /// Load the stored project, failing if there is none.
    pub fn open(&self) -> Result<(ProjectStore, DirectoryStore), CommandError> {
        let storage = self.storage();
        let mut store = self.empty_store();
        if !store.load_from(&storage)? {
            return Err(CommandError::NoProject(storage.root().to_path_buf()));
        }
        Ok((store, storage))
    }
}

/// Parse `X,Y`.
pub(crate) fn parse_point(s: &str) -> Result<(usize, usize), String> {
    match parse_numbers(s, 2)?.as_slice() {
        [x, y] => Ok((*x, *y)),
        _ => Err(format!("expected X,Y, got '{}'", s)),
    }
}

/// Parse `X0,Y0,X1,Y1`.
pub(crate) fn parse_line(s: &str) -> Result<[usize; 4], String> {
    match parse_numbers(s, 4)?.as_slice() {
        [x0, y0, x1, y1] => Ok([*x0, *y0, *x1, *y1]),
        _ => Err(format!("expected X0,Y0,X1,Y1, got '{}'", s)),
    }
}

fn parse_numbers(s: &str, count: usize) -> Result<Vec<usize>, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != count {
        return Err(format!("expected {} comma-separated numbers, got '{}'", count, s));
    }
    parts
        .into_iter()
        .map(|p| p.parse::<usize>().map_err(|_| format!("'{}' is not a non-negative integer", p)))
        .collect()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, wins over -v
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}

/// Run the CLI application. Installs the global logger, so call it once per process.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = match Context::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => return finish(Err(e)),
    };

    let result = match cli.command {
        Commands::New { sprite_size, bank_size, palette_size, force } => {
            let overrides = CliOverrides { sprite_size, bank_size, palette_size, ..Default::default() };
            project::run_new(ctx, &overrides, force)
        }
        Commands::Info { json } => project::run_info(&ctx, json),
        Commands::Import { file } => project::run_import(&ctx, &file),
        Commands::ExportProject { output } => project::run_export_project(&ctx, output.as_deref()),
        Commands::Erase { yes } => project::run_erase(&ctx, yes),
        Commands::Transparent { state } => project::run_transparent(&ctx, state == Toggle::On),
        Commands::Export { output, name, columns, compact } => {
            let overrides = CliOverrides {
                out: output,
                name,
                columns,
                pretty: compact.then_some(false),
                ..Default::default()
            };
            export::run_export(ctx, &overrides)
        }
        Commands::Draw { sprite, colour, set, erase, line, tool } => {
            let ops = draw::DrawOps { set, erase, line, tools: tool };
            draw::run_draw(&ctx, sprite, colour, &ops)
        }
        Commands::Preview { sprite, output, cell_size } => {
            let overrides = CliOverrides { cell_size, ..Default::default() };
            draw::run_preview(ctx, &overrides, sprite, output.as_deref())
        }
        Commands::Palette { action } => palette::run_palette(&ctx, action),
        Commands::Map { action } => map::run_map(&ctx, action),
        Commands::Sprite { action } => sprite::run_sprite(&ctx, action),
    };

    finish(result)
}
