//! Thumbnail cache for tile map cells
//!
//! Thumbnails are derived data: a sprite's raster under the current palette.
//! Entries are keyed by sprite index and stamped with the palette version they
//! were rendered against, so a palette edit invalidates everything at once and
//! a sprite edit invalidates only that sprite.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use image::RgbaImage;

use crate::models::{Palette, SpriteBank, TileMap};
use crate::surface::blank_image;

#[derive(Debug, Clone)]
struct CachedThumbnail {
    palette_version: u64,
    image: RgbaImage,
}

/// Per-sprite thumbnail images for drawing the tile map.
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    size: u32,
    transparent: bool,
    palette_version: u64,
    placeholder: RgbaImage,
    entries: HashMap<usize, CachedThumbnail>,
    renders: u64,
}

impl ThumbnailCache {
    pub fn new(size: usize, transparent: bool) -> Self {
        let size = size as u32;
        Self {
            size,
            transparent,
            palette_version: 0,
            placeholder: blank_image(size, size, transparent),
            entries: HashMap::new(),
            renders: 0,
        }
    }

    /// Image shown for empty cells.
    pub fn placeholder(&self) -> &RgbaImage {
        &self.placeholder
    }

    /// Number of sprite rasters produced so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Every thumbnail is now stale.
    pub fn on_palette_changed(&mut self) {
        self.palette_version += 1;
    }

    /// Thumbnails showing `sprite_index` are now stale.
    pub fn on_sprite_changed(&mut self, sprite_index: usize) {
        self.entries.remove(&sprite_index);
    }

    /// Switch the empty placeholder between transparent and black.
    pub fn set_transparent(&mut self, transparent: bool) {
        if self.transparent != transparent {
            self.transparent = transparent;
            self.placeholder = blank_image(self.size, self.size, transparent);
        }
    }

    /// Drop everything, e.g. after the whole project was replaced.
    pub fn reset(&mut self, size: usize, transparent: bool) {
        *self = Self { renders: self.renders, ..Self::new(size, transparent) };
    }

    /// Thumbnail for a map cell value.
    ///
    /// `-1`, and any index past the end of the bank, gets the placeholder.
    pub fn thumbnail_for(&mut self, cell: i32, bank: &SpriteBank, palette: &Palette) -> &RgbaImage {
        let Some((index, sprite)) =
            usize::try_from(cell).ok().and_then(|i| bank.get(i).map(|s| (i, s)))
        else {
            return &self.placeholder;
        };

        let version = self.palette_version;
        match self.entries.entry(index) {
            Entry::Occupied(mut entry) => {
                if entry.get().palette_version != version {
                    self.renders += 1;
                    *entry.get_mut() =
                        CachedThumbnail { palette_version: version, image: sprite.raster_to_image(palette) };
                }
                &entry.into_mut().image
            }
            Entry::Vacant(entry) => {
                self.renders += 1;
                &entry
                    .insert(CachedThumbnail {
                        palette_version: version,
                        image: sprite.raster_to_image(palette),
                    })
                    .image
            }
        }
    }

    /// Compose the whole map into one image, one thumbnail per cell.
    pub fn render_map(&mut self, map: &TileMap, bank: &SpriteBank, palette: &Palette) -> RgbaImage {
        let size = self.size;
        let mut out = blank_image(map.width() as u32 * size, map.height() as u32 * size, true);
        for (i, &cell) in map.cells().iter().enumerate() {
            let x = (i % map.width()) as u32 * size;
            let y = (i / map.width()) as u32 * size;
            let thumb = self.thumbnail_for(cell, bank, palette);
            image::imageops::replace(&mut out, thumb, x as i64, y as i64);
        }
        out
    }
}
