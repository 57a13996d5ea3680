//! Resize uploads to the fixed square thumbnail and re-encode as RGBA PNG.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use snapvote_types::image::THUMBNAIL_SIZE;

/// Decode any supported format, resize to `THUMBNAIL_SIZE` square with
/// Lanczos3 (aspect ratio is not preserved), and encode as RGBA PNG.
pub fn normalize_to_png(bytes: &[u8]) -> Result<Vec<u8>, String> {
    let decoded = image::load_from_memory(bytes).map_err(|e| format!("decode failed: {e}"))?;
    let resized = decoded.resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
    let rgba = DynamicImage::ImageRgba8(resized.to_rgba8());

    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| format!("encode failed: {e}"))?;
    Ok(out.into_inner())
}
