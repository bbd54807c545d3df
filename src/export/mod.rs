//! Sprite sheet export
//!
//! A project's sprite bank is packed into one PNG raster laid out on a fixed
//! column grid, plus a JSON side-car describing where each sprite landed.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use pixed::export::{pack_sheet, write_sheet, ExportOptions};
//! # fn demo(project: &pixed::models::Project) -> Result<(), pixed::export::ExportError> {
//! let sheet = pack_sheet(project, 8, "sprites")?;
//! write_sheet(&sheet, Path::new("build"), &ExportOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod json;
pub mod png;
pub mod sheet;

pub use json::JsonExporter;
pub use png::PngExporter;
pub use sheet::{pack_sheet, PackedSheet, SheetEntry, SheetMetadata, DEFAULT_COLUMNS};

use std::path::{Path, PathBuf};

use crate::output::OutputError;

/// Common error type for export operations.
#[derive(Debug)]
pub enum ExportError {
    /// IO error during file writing
    Io(std::io::Error),
    /// PNG encoding error
    Image(image::ImageError),
    /// Serialization error
    Serialization(String),
    /// Invalid configuration
    Config(String),
    /// Nothing to export
    Empty,
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Image(e) => write!(f, "Image error: {}", e),
            ExportError::Serialization(e) => write!(f, "Serialization error: {}", e),
            ExportError::Config(e) => write!(f, "Configuration error: {}", e),
            ExportError::Empty => write!(f, "sprite bank is empty, nothing to export"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialization(e.to_string())
    }
}

impl From<OutputError> for ExportError {
    fn from(e: OutputError) -> Self {
        match e {
            OutputError::Io(e) => ExportError::Io(e),
            OutputError::Image(e) => ExportError::Image(e),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pretty print the metadata (with indentation)
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// One artifact of an exported sheet.
pub trait Exporter {
    /// Write this exporter's artifact for `sheet` to `output_path`.
    fn export(&self, sheet: &PackedSheet, output_path: &Path, options: &ExportOptions)
        -> Result<()>;

    /// Get the format name for this exporter.
    fn format_name(&self) -> &'static str;

    /// Get the default file extension for this format.
    fn extension(&self) -> &'static str;
}

/// Write `<name>.png` and `<name>.json` into `dir`.
///
/// Returns the written paths, raster first.
pub fn write_sheet(sheet: &PackedSheet, dir: &Path, options: &ExportOptions) -> Result<Vec<PathBuf>> {
    let exporters: [&dyn Exporter; 2] = [&PngExporter, &JsonExporter];
    let mut written = Vec::with_capacity(exporters.len());
    for exporter in exporters {
        let path = dir.join(format!("{}.{}", sheet.name(), exporter.extension()));
        exporter.export(sheet, &path, options)?;
        log::debug!("{} export written to {}", exporter.format_name(), path.display());
        written.push(path);
    }
    Ok(written)
}
