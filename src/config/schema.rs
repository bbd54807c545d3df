//! Configuration schema types for `pixed.toml`
//!
//! Every section and key is optional; missing values take the defaults below.
//!
//! ```toml
//! [project]
//! sprite_size = 12
//! bank_size = 128
//! palette_size = 16
//! storage = ".pixed"
//!
//! [map]
//! width = 12
//! height = 6
//!
//! [export]
//! columns = 8
//! name = "sprites"
//! pretty = true
//! out = "build"
//!
//! [editor]
//! cell_size = 32
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::ExportOptions;
use crate::models::NewProjectSettings;

/// Dimensions of new projects and where the project slot lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Edge length of every sprite in a new project
    pub sprite_size: usize,
    /// Number of sprites in a new project
    pub bank_size: usize,
    /// Number of random colours in a new project
    pub palette_size: usize,
    /// Storage directory for the project slot
    pub storage: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            sprite_size: 12,
            bank_size: 128,
            palette_size: 16,
            storage: PathBuf::from(".pixed"),
        }
    }
}

/// Tile map dimensions, in cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { width: 12, height: 6 }
    }
}

/// Sheet export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Grid columns of the packed sheet
    pub columns: u32,
    /// Base name of `<name>.png` / `<name>.json`
    pub name: String,
    /// Indent the metadata JSON
    pub pretty: bool,
    /// Output directory
    pub out: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            columns: crate::export::DEFAULT_COLUMNS,
            name: "sprites".to_string(),
            pretty: true,
            out: PathBuf::from("build"),
        }
    }
}

/// Editor view settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixels per sprite cell in the editor view and previews
    pub cell_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { cell_size: 32 }
    }
}

/// Complete pixed.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixedConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "map.width")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pixed.toml: '{}' {}", self.field, self.message)
    }
}

fn positive(errors: &mut Vec<ConfigValidationError>, field: &str, value: u64) {
    if value == 0 {
        errors.push(ConfigValidationError {
            field: field.to_string(),
            message: "must be a positive integer".to_string(),
        });
    }
}

impl PixedConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        positive(&mut errors, "project.sprite_size", self.project.sprite_size as u64);
        positive(&mut errors, "project.bank_size", self.project.bank_size as u64);
        positive(&mut errors, "project.palette_size", self.project.palette_size as u64);
        positive(&mut errors, "map.width", self.map.width as u64);
        positive(&mut errors, "map.height", self.map.height as u64);
        positive(&mut errors, "export.columns", u64::from(self.export.columns));
        positive(&mut errors, "editor.cell_size", u64::from(self.editor.cell_size));

        if self.project.storage.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "project.storage".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.export.name.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "export.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Settings for a freshly generated project
    pub fn new_project_settings(&self) -> NewProjectSettings {
        NewProjectSettings {
            sprite_size: self.project.sprite_size,
            bank_size: self.project.bank_size,
            palette_size: self.project.palette_size,
            map_width: self.map.width,
            map_height: self.map.height,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions { pretty: self.export.pretty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: PixedConfig = toml::from_str("").unwrap();
        assert_eq!(config, PixedConfig::default());
        assert!(config.is_valid());
    }

    #[test]
    fn test_defaults_match_new_project_defaults() {
        let config = PixedConfig::default();
        assert_eq!(config.new_project_settings(), NewProjectSettings::default());
        assert_eq!(config.export.columns, 8);
        assert_eq!(config.export.name, "sprites");
        assert_eq!(config.editor.cell_size, 32);
        assert_eq!(config.project.storage, PathBuf::from(".pixed"));
    }

    #[test]
    fn test_partial_section() {
        let config: PixedConfig = toml::from_str("[map]\nwidth = 20\n").unwrap();
        assert_eq!(config.map.width, 20);
        assert_eq!(config.map.height, 6);
    }

    #[test]
    fn test_validate_rejects_zeros() {
        let mut config = PixedConfig::default();
        config.project.sprite_size = 0;
        config.export.columns = 0;
        config.export.name = String::new();

        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["project.sprite_size", "export.columns", "export.name"]);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "map.width".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "pixed.toml: 'map.width' must be a positive integer");
    }

    #[test]
    fn test_export_options() {
        let mut config = PixedConfig::default();
        config.export.pretty = false;
        assert!(!config.export_options().pretty);
    }
}
