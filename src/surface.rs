//! Drawing surfaces
//!
//! Sprites and the tile map only ever need to fill axis-aligned rectangles,
//! so that is the whole capability a renderer has to provide.

use image::{Rgba, RgbaImage};

use crate::color::Colour;

/// Fully transparent pixel
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Opaque black, the non-transparent background
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A 2-D target that rectangles can be painted onto.
pub trait Surface {
    /// Surface width in pixels
    fn width(&self) -> u32;

    /// Surface height in pixels
    fn height(&self) -> u32;

    /// Fill a rectangle with an opaque colour. Parts outside the surface are clipped.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, colour: Colour);

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Snapshot the surface as an RGBA image.
    fn to_image(&self) -> RgbaImage;
}

impl Surface for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, colour: Colour) {
        let (width, height) = self.dimensions();
        let end_x = x.saturating_add(w).min(width);
        let end_y = y.saturating_add(h).min(height);
        let pixel = colour.to_rgba();
        for py in y..end_y {
            for px in x..end_x {
                self.put_pixel(px, py, pixel);
            }
        }
    }

    fn clear(&mut self) {
        for pixel in self.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn to_image(&self) -> RgbaImage {
        self.clone()
    }
}

/// Create a blank surface, either transparent or filled with black.
pub fn blank_image(width: u32, height: u32, transparent: bool) -> RgbaImage {
    let background = if transparent { TRANSPARENT } else { BLACK };
    RgbaImage::from_pixel(width, height, background)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_inside() {
        let mut img = RgbaImage::from_pixel(4, 4, TRANSPARENT);
        img.fill_rect(1, 1, 2, 2, Colour::rgb(255, 0, 0));
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(3, 3), TRANSPARENT);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut img = RgbaImage::from_pixel(2, 2, TRANSPARENT);
        img.fill_rect(1, 1, 10, 10, Colour::rgb(0, 255, 0));
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(0, 1), TRANSPARENT);
    }

    #[test]
    fn test_fill_rect_fully_outside_is_noop() {
        let mut img = RgbaImage::from_pixel(2, 2, TRANSPARENT);
        img.fill_rect(5, 5, 1, 1, Colour::rgb(0, 0, 255));
        assert!(img.pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn test_blank_image_backgrounds() {
        assert_eq!(*blank_image(1, 1, true).get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*blank_image(1, 1, false).get_pixel(0, 0), BLACK);
    }
}
