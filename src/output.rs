//! PNG output and file naming

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Save an RGBA image as PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    log::debug!("wrote {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// Scale by an integer factor with nearest-neighbor, keeping pixel edges crisp.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// File-system friendly stem for a sprite name.
///
/// Anything other than ASCII letters, digits, `-` and `_` becomes `_`.
pub fn sprite_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "sprite".to_string()
    } else {
        stem
    }
}

/// Where a preview of `sprite_name` goes.
///
/// | `-o` argument | Output |
/// |---------------|--------|
/// | none | `{name}.png` in the current directory |
/// | `dir/` (existing directory or trailing slash) | `dir/{name}.png` |
/// | `file.png` | `file.png` |
pub fn preview_path(sprite_name: &str, output_arg: Option<&Path>) -> PathBuf {
    let file_name = format!("{}.png", sprite_file_stem(sprite_name));
    match output_arg {
        None => PathBuf::from(file_name),
        Some(path) => {
            let is_dir = path.is_dir() || path.to_string_lossy().ends_with('/');
            if is_dir {
                path.join(file_name)
            } else {
                path.to_path_buf()
            }
        }
    }
}
