//! Tile map: a grid of references into the sprite bank.

use thiserror::Error;

/// Cell value meaning "no sprite"
pub const EMPTY_TILE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileMapError {
    #[error("map cell {index} out of range (map has {len} cells)")]
    OutOfRange { index: usize, len: usize },
    #[error("sprite index {0} cannot be stored in a map cell")]
    SpriteIndexTooLarge(usize),
}

/// A `width`×`height` grid stored row-major. Each cell is a sprite index or
/// [`EMPTY_TILE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl TileMap {
    /// An all-empty map.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![EMPTY_TILE; width * height] }
    }

    /// Rebuild a map from its stored flat form.
    ///
    /// Values are kept as stored; they are not checked against the sprite
    /// bank. Stored cells are never dropped: data longer than `width*height`
    /// adds rows (padding only the last one), shorter data is padded with
    /// empty cells.
    pub fn from_flat(mut data: Vec<i32>, width: usize, height: usize) -> Self {
        if width == 0 {
            // Nothing to lay rows out against; keep the cells as one row
            let width = data.len();
            return Self { width, height: usize::from(width > 0), cells: data };
        }
        let rows = data.len().div_ceil(width).max(height);
        let len = width * rows;
        if rows != height {
            log::warn!(
                "map data has {} cells, more than {}x{}; keeping them as {}x{}",
                data.len(),
                width,
                height,
                width,
                rows
            );
        } else if data.len() != len {
            log::warn!("map data has {} cells, padding to {}x{}", data.len(), width, height);
        }
        data.resize(len, EMPTY_TILE);
        Self { width, height: rows, cells: data }
    }

    /// The persisted representation.
    pub fn to_flat(&self) -> Vec<i32> {
        self.cells.clone()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Sprite referenced by a cell, `None` when empty (or for negative junk).
    pub fn cell(&self, index: usize) -> Result<Option<usize>, TileMapError> {
        self.check(index)?;
        let value = self.cells[index];
        Ok(if value < 0 { None } else { Some(value as usize) })
    }

    pub fn place(&mut self, index: usize, sprite_index: usize) -> Result<(), TileMapError> {
        self.check(index)?;
        let value = i32::try_from(sprite_index)
            .map_err(|_| TileMapError::SpriteIndexTooLarge(sprite_index))?;
        self.cells[index] = value;
        Ok(())
    }

    pub fn clear(&mut self, index: usize) -> Result<(), TileMapError> {
        self.check(index)?;
        self.cells[index] = EMPTY_TILE;
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.cells.fill(EMPTY_TILE);
    }

    /// Cells whose reference points past the end of a bank of `bank_len` sprites.
    pub fn stale_cells(&self, bank_len: usize) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= 0 && v as usize >= bank_len)
            .map(|(i, _)| i)
            .collect()
    }

    fn check(&self, index: usize) -> Result<(), TileMapError> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(TileMapError::OutOfRange { index, len: self.cells.len() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_empty() {
        let map = TileMap::new(12, 6);
        assert_eq!(map.len(), 72);
        assert!(map.cells().iter().all(|&c| c == EMPTY_TILE));
    }

    #[test]
    fn test_place_then_clear() {
        let mut map = TileMap::new(3, 2);
        map.place(4, 7).unwrap();
        assert_eq!(map.cell(4), Ok(Some(7)));
        map.clear(4).unwrap();
        assert_eq!(map.cell(4), Ok(None));
        assert_eq!(map.to_flat()[4], EMPTY_TILE);
    }

    #[test]
    fn test_out_of_range() {
        let mut map = TileMap::new(2, 2);
        assert_eq!(map.place(4, 0), Err(TileMapError::OutOfRange { index: 4, len: 4 }));
        assert!(map.clear(9).is_err());
    }

    #[test]
    fn test_clear_all() {
        let mut map = TileMap::from_flat(vec![0, 1, 2, 3], 2, 2);
        map.clear_all();
        assert_eq!(map.to_flat(), vec![-1, -1, -1, -1]);
    }

    #[test]
    fn test_from_flat_roundtrip() {
        let data = vec![-1, 3, 0, -1, 5, 2];
        let map = TileMap::from_flat(data.clone(), 3, 2);
        assert_eq!(map.to_flat(), data);
    }

    #[test]
    fn test_from_flat_pads_short_data() {
        assert_eq!(TileMap::from_flat(vec![1], 2, 1).to_flat(), vec![1, -1]);
    }

    #[test]
    fn test_from_flat_keeps_extra_cells_as_rows() {
        let map = TileMap::from_flat(vec![1, 2, 3], 2, 1);
        assert_eq!((map.width(), map.height()), (2, 2));
        assert_eq!(map.to_flat(), vec![1, 2, 3, -1]);

        let map = TileMap::from_flat(vec![-1, -1, -1, -1, -1, 3], 2, 2);
        assert_eq!(map.height(), 3);
        assert_eq!(map.cell(5), Ok(Some(3)));
    }

    #[test]
    fn test_stale_cells() {
        let map = TileMap::from_flat(vec![0, 4, -1, 9], 2, 2);
        assert_eq!(map.stale_cells(4), vec![1, 3]);
        assert!(map.stale_cells(10).is_empty());
    }
}
