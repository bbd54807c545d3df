//! Sprite bitmaps: square grids of palette indices.

use std::collections::BTreeSet;

use image::RgbaImage;
use thiserror::Error;

use super::palette::Palette;
use crate::surface::{Surface, TRANSPARENT};

/// One sprite cell: a palette index, or `None` for an empty (transparent) cell.
pub type Cell = Option<usize>;

/// Errors from sprite data loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    /// The grid doesn't match the sprite's declared size
    #[error("sprite '{name}' is {size}x{size} but grid is {detail}")]
    SizeMismatch { name: String, size: usize, detail: String },
}

/// A square bitmap of palette indices.
///
/// `data` is indexed `data[y][x]` and is always `size` rows of `size` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    name: String,
    size: usize,
    data: Vec<Vec<Cell>>,
}

impl Sprite {
    /// Create a sprite with every cell empty.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self { name: name.into(), size, data: vec![vec![None; size]; size] }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data(&self) -> &[Vec<Cell>] {
        &self.data
    }

    /// Replace the grid wholesale.
    ///
    /// Fails with [`SpriteError::SizeMismatch`] unless `grid` is exactly
    /// `size` rows of `size` cells; the sprite is untouched on failure.
    pub fn load_data(&mut self, grid: Vec<Vec<Cell>>) -> Result<(), SpriteError> {
        if grid.len() != self.size {
            return Err(self.mismatch(format!("{} rows", grid.len())));
        }
        if let Some((y, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != self.size) {
            return Err(self.mismatch(format!("{} cells wide at row {}", row.len(), y)));
        }
        self.data = grid;
        Ok(())
    }

    fn mismatch(&self, detail: String) -> SpriteError {
        SpriteError::SizeMismatch { name: self.name.clone(), size: self.size, detail }
    }

    /// # Panics
    ///
    /// Panics if `x` or `y` is not below `size`.
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.assert_in_bounds(x, y);
        self.data[y][x]
    }

    /// # Panics
    ///
    /// Panics if `x` or `y` is not below `size`.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.assert_in_bounds(x, y);
        self.data[y][x] = cell;
    }

    fn assert_in_bounds(&self, x: usize, y: usize) {
        assert!(
            x < self.size && y < self.size,
            "cell ({}, {}) out of bounds for {}x{} sprite '{}'",
            x,
            y,
            self.size,
            self.size,
            self.name
        );
    }

    /// Composite the sprite onto `surface` with its top-left at `(origin_x, origin_y)`.
    ///
    /// Only non-empty cells are painted. A cell whose index has no palette
    /// entry is skipped like an empty one.
    pub fn draw_onto<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        origin_x: u32,
        origin_y: u32,
        palette: &Palette,
    ) {
        for (y, row) in self.data.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(colour) = cell.and_then(|i| palette.colour_at(i)) {
                    surface.fill_rect(origin_x + x as u32, origin_y + y as u32, 1, 1, colour);
                }
            }
        }
    }

    /// Render the sprite on its own as a `size`×`size` transparent-backed image.
    pub fn raster_to_image(&self, palette: &Palette) -> RgbaImage {
        let side = self.size as u32;
        let mut image = RgbaImage::from_pixel(side, side, TRANSPARENT);
        self.draw_onto(&mut image, 0, 0, palette);
        image
    }

    /// Distinct palette indices used by non-empty cells.
    pub fn distinct_colours(&self) -> BTreeSet<usize> {
        self.data.iter().flatten().filter_map(|c| *c).collect()
    }

    /// The single palette index of a monochrome sprite.
    pub fn monochrome_index(&self) -> Option<usize> {
        let colours = self.distinct_colours();
        if colours.len() == 1 {
            colours.into_iter().next()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.data {
            row.fill(None);
        }
    }

    /// Mirror left-right.
    pub fn flip_horizontal(&mut self) {
        for row in &mut self.data {
            row.reverse();
        }
    }

    /// Mirror top-bottom.
    pub fn flip_vertical(&mut self) {
        self.data.reverse();
    }

    /// Set every non-empty cell to `target`.
    pub fn recolor_all(&mut self, target: usize) {
        for cell in self.data.iter_mut().flatten() {
            if cell.is_some() {
                *cell = Some(target);
            }
        }
    }

    /// Move content up one row; the top row wraps to the bottom.
    pub fn shift_up(&mut self) {
        if !self.data.is_empty() {
            self.data.rotate_left(1);
        }
    }

    /// Move content down one row; the bottom row wraps to the top.
    pub fn shift_down(&mut self) {
        if !self.data.is_empty() {
            self.data.rotate_right(1);
        }
    }

    /// Move content left one column; the left column wraps to the right.
    pub fn shift_left(&mut self) {
        for row in self.data.iter_mut().filter(|r| !r.is_empty()) {
            row.rotate_left(1);
        }
    }

    /// Move content right one column; the right column wraps to the left.
    pub fn shift_right(&mut self) {
        for row in self.data.iter_mut().filter(|r| !r.is_empty()) {
            row.rotate_right(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Colour;
    use image::Rgba;

    fn numbered(size: usize) -> Sprite {
        let mut s = Sprite::new("n", size);
        for y in 0..size {
            for x in 0..size {
                s.set_cell(x, y, Some(y * size + x));
            }
        }
        s
    }

    #[test]
    fn test_new_sprite_is_empty() {
        let s = Sprite::new("blank", 4);
        assert_eq!(s.data().len(), 4);
        assert!(s.data().iter().all(|row| row.len() == 4 && row.iter().all(Option::is_none)));
    }

    #[test]
    fn test_load_data_wrong_row_count() {
        let mut s = numbered(2);
        let before = s.clone();
        let err = s.load_data(vec![vec![None, None]]).unwrap_err();
        assert!(matches!(err, SpriteError::SizeMismatch { size: 2, .. }));
        assert_eq!(s, before);
    }

    #[test]
    fn test_load_data_ragged_row() {
        let mut s = numbered(2);
        let before = s.clone();
        assert!(s.load_data(vec![vec![None, None], vec![None]]).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn test_load_data_accepts_exact_grid() {
        let mut s = Sprite::new("a", 2);
        s.load_data(vec![vec![Some(1), None], vec![None, Some(2)]]).unwrap();
        assert_eq!(s.cell(0, 0), Some(1));
        assert_eq!(s.cell(1, 1), Some(2));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_cell_out_of_bounds_panics() {
        Sprite::new("a", 2).set_cell(2, 0, Some(0));
    }

    #[test]
    fn test_flip_horizontal() {
        let mut s = numbered(2);
        s.flip_horizontal();
        assert_eq!(s.data(), &[vec![Some(1), Some(0)], vec![Some(3), Some(2)]]);
    }

    #[test]
    fn test_flip_vertical() {
        let mut s = numbered(2);
        s.flip_vertical();
        assert_eq!(s.data(), &[vec![Some(2), Some(3)], vec![Some(0), Some(1)]]);
    }

    #[test]
    fn test_shift_up_wraps_top_row() {
        let mut s = numbered(3);
        s.shift_up();
        assert_eq!(s.data()[0], vec![Some(3), Some(4), Some(5)]);
        assert_eq!(s.data()[2], vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_shift_right_wraps_last_column() {
        let mut s = numbered(3);
        s.shift_right();
        assert_eq!(s.data()[0], vec![Some(2), Some(0), Some(1)]);
    }

    #[test]
    fn test_shift_then_opposite_restores() {
        let original = numbered(4);
        let mut s = original.clone();
        s.shift_left();
        s.shift_right();
        s.shift_down();
        s.shift_up();
        assert_eq!(s, original);
    }

    #[test]
    fn test_recolor_keeps_empty_cells() {
        let mut s = Sprite::new("r", 2);
        s.set_cell(0, 0, Some(1));
        s.set_cell(1, 1, Some(5));
        s.recolor_all(7);
        assert_eq!(s.data(), &[vec![Some(7), None], vec![None, Some(7)]]);
    }

    #[test]
    fn test_clear() {
        let mut s = numbered(3);
        s.clear();
        assert!(s.distinct_colours().is_empty());
    }

    #[test]
    fn test_distinct_colours() {
        let mut s = Sprite::new("d", 3);
        assert!(s.distinct_colours().is_empty());
        assert_eq!(s.monochrome_index(), None);

        s.set_cell(0, 0, Some(3));
        s.set_cell(2, 1, Some(3));
        assert_eq!(s.distinct_colours(), BTreeSet::from([3]));
        assert_eq!(s.monochrome_index(), Some(3));

        s.set_cell(1, 1, Some(4));
        assert_eq!(s.monochrome_index(), None);
    }

    #[test]
    fn test_raster_to_image() {
        let palette = Palette::new(vec![Colour::rgb(255, 0, 0), Colour::rgb(0, 0, 255)]);
        let mut s = Sprite::new("img", 2);
        s.set_cell(0, 0, Some(0));
        s.set_cell(1, 1, Some(1));
        s.set_cell(1, 0, Some(9)); // no such palette entry

        let img = s.raster_to_image(&palette);
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(1, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(0, 1), TRANSPARENT);
    }

    #[test]
    fn test_draw_onto_composites() {
        let palette = Palette::new(vec![Colour::rgb(0, 255, 0)]);
        let mut s = Sprite::new("c", 2);
        s.set_cell(1, 0, Some(0));

        let under = Rgba([9, 9, 9, 255]);
        let mut canvas = RgbaImage::from_pixel(4, 4, under);
        s.draw_onto(&mut canvas, 2, 2, &palette);
        assert_eq!(*canvas.get_pixel(3, 2), Rgba([0, 255, 0, 255]));
        // Empty cells leave what was underneath
        assert_eq!(*canvas.get_pixel(2, 2), under);
        assert_eq!(*canvas.get_pixel(0, 0), under);
    }
}
