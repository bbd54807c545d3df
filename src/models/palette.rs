//! Palette: ordered colours plus a selection cursor.

use rand::Rng;
use thiserror::Error;

use crate::color::{is_hex_color, Colour};

/// Errors for operator-supplied palette indices
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette index {index} out of range (palette has {len} colors)")]
    OutOfRange { index: usize, len: usize },
}

/// A line of bulk text that failed validation and was replaced with black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Palette index the line applied to
    pub index: usize,
    /// The offending text, after trimming
    pub input: String,
}

/// Summary of a bulk text decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDecode {
    /// Indices whose colour was (re)written, substitutions included
    pub updated: Vec<usize>,
    /// Lines that failed the colour pattern
    pub substituted: Vec<Substitution>,
}

/// Ordered colour list. Insertion order is the index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<Colour>,
    selected: usize,
}

impl Palette {
    pub fn new(colours: Vec<Colour>) -> Self {
        Self { colours, selected: 0 }
    }

    /// A palette of `len` random colours, as used for a fresh project.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self::new((0..len).map(|_| Colour::random(rng)).collect())
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// Colour at `index`, or `None` past the end.
    pub fn colour_at(&self, index: usize) -> Option<Colour> {
        self.colours.get(index).copied()
    }

    /// Index of the selected colour. `None` only when the palette is empty.
    pub fn selected(&self) -> Option<usize> {
        if self.colours.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected_colour(&self) -> Option<Colour> {
        self.selected().and_then(|i| self.colour_at(i))
    }

    pub fn select(&mut self, index: usize) -> Result<(), PaletteError> {
        self.check(index)?;
        self.selected = index;
        Ok(())
    }

    /// Replace the colour at `index`.
    pub fn set_colour_at(&mut self, index: usize, colour: Colour) -> Result<(), PaletteError> {
        self.check(index)?;
        self.colours[index] = colour;
        Ok(())
    }

    fn check(&self, index: usize) -> Result<(), PaletteError> {
        if index < self.colours.len() {
            Ok(())
        } else {
            Err(PaletteError::OutOfRange { index, len: self.colours.len() })
        }
    }

    /// Encode the palette as editable text: one colour per line, `#` stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixed::color::Colour;
    /// use pixed::models::Palette;
    ///
    /// let palette = Palette::new(vec![Colour::rgb(255, 0, 0), Colour::rgb(0, 0, 255)]);
    /// assert_eq!(palette.encode_bulk_text(), "FF0000\n0000FF");
    /// ```
    pub fn encode_bulk_text(&self) -> String {
        self.colours.iter().map(Colour::hex_digits).collect::<Vec<_>>().join("\n")
    }

    /// Apply edited bulk text back onto the palette.
    ///
    /// Line `i` updates colour `i`. Each line is trimmed and gets a `#` prefix
    /// if it lacks one. Lines failing `#RRGGBB` become `#000000`. Blank lines
    /// keep the existing colour. Lines past the palette length are ignored and
    /// colours past the last line are untouched.
    pub fn decode_bulk_text(&mut self, text: &str) -> BulkDecode {
        let mut result = BulkDecode::default();

        for (index, line) in text.split('\n').enumerate().take(self.colours.len()) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let candidate =
                if trimmed.starts_with('#') { trimmed.to_string() } else { format!("#{}", trimmed) };

            let colour = if is_hex_color(&candidate) {
                candidate.parse().unwrap_or(Colour::BLACK)
            } else {
                log::warn!(
                    "palette line {}: '{}' is not a #RRGGBB color, using #000000",
                    index + 1,
                    trimmed
                );
                result.substituted.push(Substitution { index, input: trimmed.to_string() });
                Colour::BLACK
            };

            self.colours[index] = colour;
            result.updated.push(index);
        }

        result
    }
}
