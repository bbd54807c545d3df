//! Sprite bank: the project's fixed-length list of sprites.

use thiserror::Error;

use super::sprite::{Sprite, SpriteError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("sprite index {index} out of range (bank has {len} sprites)")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Sprite(#[from] SpriteError),
}

/// Ordered sprites plus the selection cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteBank {
    sprites: Vec<Sprite>,
    selected: usize,
}

impl SpriteBank {
    /// `count` blank sprites of `size`, named `Sprite 0`, `Sprite 1`, ...
    pub fn blank(count: usize, size: usize) -> Self {
        Self::new((0..count).map(|i| Sprite::new(format!("Sprite {}", i), size)).collect())
    }

    pub fn new(sprites: Vec<Sprite>) -> Self {
        Self { sprites, selected: 0 }
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sprite> {
        self.sprites.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Sprite> {
        self.sprites.get_mut(index)
    }

    /// Like [`get_mut`](Self::get_mut) but with an error naming the bad index.
    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut Sprite, BankError> {
        let len = self.sprites.len();
        self.sprites.get_mut(index).ok_or(BankError::OutOfRange { index, len })
    }

    /// Selected sprite index. `None` only when the bank is empty.
    pub fn selected_index(&self) -> Option<usize> {
        if self.sprites.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected(&self) -> Option<&Sprite> {
        self.sprites.get(self.selected)
    }

    pub fn select(&mut self, index: usize) -> Result<(), BankError> {
        if index >= self.sprites.len() {
            return Err(BankError::OutOfRange { index, len: self.sprites.len() });
        }
        self.selected = index;
        Ok(())
    }

    /// Copy pixel data and name of sprite `from` onto sprite `to`.
    pub fn copy_sprite(&mut self, from: usize, to: usize) -> Result<(), BankError> {
        let source = self
            .sprites
            .get(from)
            .cloned()
            .ok_or(BankError::OutOfRange { index: from, len: self.sprites.len() })?;
        let target = self.try_get_mut(to)?;
        target.load_data(source.data().to_vec())?;
        target.set_name(source.name());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SpriteBank {
    type Item = &'a Sprite;
    type IntoIter = std::slice::Iter<'a, Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}
