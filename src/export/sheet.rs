//! Sheet packing: sprite bank to one raster plus metadata

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::{ExportError, Result};
use crate::models::Project;
use crate::surface::TRANSPARENT;

/// Columns used when none are configured
pub const DEFAULT_COLUMNS: u32 = 8;

/// Where one sprite sits in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub name: String,
    pub x: u32,
    pub y: u32,
    /// The single palette index used, `null` unless the sprite is monochrome
    #[serde(rename = "paletteIndex")]
    pub palette_index: Option<usize>,
}

/// JSON side-car for a packed sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub size: usize,
    pub count: usize,
    /// File name of the raster
    pub source: String,
    pub sprites: Vec<SheetEntry>,
}

/// A packed raster with its metadata.
#[derive(Debug, Clone)]
pub struct PackedSheet {
    name: String,
    columns: u32,
    rows: u32,
    pub image: RgbaImage,
    pub metadata: SheetMetadata,
}

impl PackedSheet {
    /// Base file name shared by the raster and metadata.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }
}

/// Pack every sprite of the bank, in bank order, row-major on a `columns` grid.
///
/// Sprite `i` lands at `((i % columns) * size, (i / columns) * size)`. Empty
/// cells and unused grid slots stay transparent.
///
/// # Examples
///
/// ```
/// use pixed::export::pack_sheet;
/// use pixed::models::{NewProjectSettings, Project};
///
/// let settings = NewProjectSettings { sprite_size: 16, bank_size: 10, ..Default::default() };
/// let project = Project::generate(&settings, &mut rand::thread_rng());
///
/// let sheet = pack_sheet(&project, 8, "sprites").unwrap();
/// assert_eq!(sheet.image.dimensions(), (128, 32));
/// assert_eq!((sheet.metadata.sprites[8].x, sheet.metadata.sprites[8].y), (0, 16));
/// ```
pub fn pack_sheet(project: &Project, columns: u32, name: &str) -> Result<PackedSheet> {
    if columns == 0 {
        return Err(ExportError::Config("columns must be at least 1".to_string()));
    }
    if name.trim().is_empty() {
        return Err(ExportError::Config("sheet name must not be empty".to_string()));
    }
    if project.sprites.is_empty() {
        return Err(ExportError::Empty);
    }

    let size = project.size as u32;
    let count = project.sprites.len() as u32;
    let rows = count.div_ceil(columns);
    let mut image = RgbaImage::from_pixel(size * columns, size * rows, TRANSPARENT);

    let mut entries = Vec::with_capacity(project.sprites.len());
    for (i, sprite) in project.sprites.iter().enumerate() {
        let x = (i as u32 % columns) * size;
        let y = (i as u32 / columns) * size;
        sprite.draw_onto(&mut image, x, y, &project.palette);
        entries.push(SheetEntry {
            name: sprite.name().to_string(),
            x,
            y,
            palette_index: sprite.monochrome_index(),
        });
    }

    log::debug!(
        "packed {} sprites into {}x{} sheet ({} columns)",
        count,
        image.width(),
        image.height(),
        columns
    );

    Ok(PackedSheet {
        name: name.to_string(),
        columns,
        rows,
        image,
        metadata: SheetMetadata {
            size: project.size,
            count: project.sprites.len(),
            source: format!("{}.png", name),
            sprites: entries,
        },
    })
}
