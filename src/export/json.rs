//! JSON side-car writer
//!
//! ```json
//! {
//!   "size": 16,
//!   "count": 2,
//!   "source": "sprites.png",
//!   "sprites": [
//!     {"name": "Sprite 0", "x": 0, "y": 0, "paletteIndex": null},
//!     {"name": "Sprite 1", "x": 16, "y": 0, "paletteIndex": 3}
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::{ExportOptions, Exporter, PackedSheet, Result, SheetMetadata};

/// Writes the sheet metadata as JSON.
#[derive(Debug, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    /// Metadata as a JSON string.
    pub fn export_to_string(&self, metadata: &SheetMetadata, options: &ExportOptions) -> Result<String> {
        let json = if options.pretty {
            serde_json::to_string_pretty(metadata)?
        } else {
            serde_json::to_string(metadata)?
        };
        Ok(json)
    }
}

impl Exporter for JsonExporter {
    fn export(&self, sheet: &PackedSheet, output_path: &Path, options: &ExportOptions) -> Result<()> {
        let json = self.export_to_string(&sheet.metadata, options)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = File::create(output_path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
