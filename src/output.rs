//! PNG output and file path generation

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Create the parent directories of `path` if they don't exist yet.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art. A factor of 0 or 1, or
/// one that would overflow the output dimensions, returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    match (w.checked_mul(factor), h.checked_mul(factor)) {
        (Some(width), Some(height)) => {
            image::imageops::resize(&image, width, height, FilterType::Nearest)
        }
        _ => {
            log::warn!("cannot scale {}x{} image by {}, keeping original size", w, h, factor);
            image
        }
    }
}

/// Whether the path asks for an animated GIF.
pub fn is_gif_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}

/// Default output next to the scene file: `{stem}.png`, or `{stem}.gif` for
/// multi-tick playback.
pub fn default_output_path(input: &Path, animated: bool) -> PathBuf {
    let ext = if animated { "gif" } else { "png" };
    input.with_extension(ext)
}

/// Output path for one tick of a PNG sequence.
///
/// | Scenario | Output |
/// |----------|--------|
/// | Single tick, `-o out.png` | `out.png` |
/// | Multiple ticks, `-o out.png` | `out_0.png`, `out_1.png`, ... |
/// | `-o dir/` | `dir/0.png`, `dir/1.png`, ... |
pub fn tick_output_path(output: &Path, tick: usize, is_single_tick: bool) -> PathBuf {
    let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
    if is_dir {
        return output.join(format!("{}.png", tick));
    }
    if is_single_tick {
        return output.to_path_buf();
    }

    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let file_name = format!("{}_{}.png", stem, tick);
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}
