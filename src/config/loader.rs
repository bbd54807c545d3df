//! Configuration loading and discovery for `pixed.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PixedConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up during discovery
pub const CONFIG_FILE_NAME: &str = "pixed.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pixed.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub sprite_size: Option<usize>,
    pub bank_size: Option<usize>,
    pub palette_size: Option<usize>,
    /// Override export output directory
    pub out: Option<PathBuf>,
    pub name: Option<String>,
    pub columns: Option<u32>,
    pub pretty: Option<bool>,
    pub cell_size: Option<u32>,
}

/// A discovered config file and the directory its relative paths resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub root: PathBuf,
}

/// Find pixed.toml.
///
/// Search order:
/// 1. Walk up from the current directory looking for pixed.toml
/// 2. Check XDG_CONFIG_HOME/pixed/pixed.toml (or ~/.config/pixed/pixed.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find pixed.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pixed").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find pixed.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve which config file applies, and its root.
///
/// An explicit path or a file found by walking up from `cwd` roots relative
/// paths at its own directory. The user-wide XDG file roots them at `cwd`.
pub fn locate_config(explicit: Option<&Path>, cwd: &Path) -> Option<ConfigLocation> {
    let dir_of = |path: &Path| match project_root(path) {
        Some(parent) if !parent.as_os_str().is_empty() => resolve_path(cwd, parent),
        _ => cwd.to_path_buf(),
    };

    if let Some(path) = explicit {
        return Some(ConfigLocation { path: path.to_path_buf(), root: dir_of(path) });
    }
    if let Some(path) = find_config_from(cwd.to_path_buf()) {
        let root = dir_of(&path);
        return Some(ConfigLocation { path, root });
    }
    find_xdg_config().map(|path| ConfigLocation { path, root: cwd.to_path_buf() })
}

/// Load configuration from a pixed.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<PixedConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<PixedConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PixedConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Configuration used when no pixed.toml is found.
pub fn default_config() -> PixedConfig {
    PixedConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The result is
/// validated again so a `--columns 0` fails the same way a bad file does.
pub fn merge_cli_overrides(
    config: &mut PixedConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(size) = overrides.sprite_size {
        config.project.sprite_size = size;
    }
    if let Some(size) = overrides.bank_size {
        config.project.bank_size = size;
    }
    if let Some(size) = overrides.palette_size {
        config.project.palette_size = size;
    }
    if let Some(ref out) = overrides.out {
        config.export.out = out.clone();
    }
    if let Some(ref name) = overrides.name {
        config.export.name = name.clone();
    }
    if let Some(columns) = overrides.columns {
        config.export.columns = columns;
    }
    if let Some(pretty) = overrides.pretty {
        config.export.pretty = pretty;
    }
    if let Some(cell_size) = overrides.cell_size {
        config.editor.cell_size = cell_size;
    }

    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
