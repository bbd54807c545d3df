//! PNG raster writer

use std::path::Path;

use super::{ExportOptions, Exporter, PackedSheet, Result};
use crate::output::save_png;

/// Writes the packed raster.
#[derive(Debug, Default)]
pub struct PngExporter;

impl Exporter for PngExporter {
    fn export(&self, sheet: &PackedSheet, output_path: &Path, _options: &ExportOptions) -> Result<()> {
        save_png(&sheet.image, output_path)?;
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "png"
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
