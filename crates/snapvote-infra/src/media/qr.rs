//! QR code rendering.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

/// Pixel size of one QR module.
pub const MODULE_PIXELS: u32 = 5;

/// Quiet-zone width in modules.
pub const BORDER_MODULES: u32 = 2;

/// Encode `text` with low error correction and render it as a PNG.
pub fn render_png(text: &str) -> Result<Vec<u8>, String> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)
        .map_err(|e| format!("QR encoding failed: {e}"))?;

    let width = code.width() as u32;
    let colors = code.to_colors();
    let side = (width + 2 * BORDER_MODULES) * MODULE_PIXELS;

    let img = image::ImageBuffer::from_fn(side, side, |x, y| {
        let mx = (x / MODULE_PIXELS) as i64 - BORDER_MODULES as i64;
        let my = (y / MODULE_PIXELS) as i64 - BORDER_MODULES as i64;
        let inside = (0..width as i64).contains(&mx) && (0..width as i64).contains(&my);
        let dark = inside
            && colors[(my as usize) * width as usize + mx as usize] == qrcode::Color::Dark;
        if dark { Luma([0u8]) } else { Luma([255u8]) }
    });

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| format!("encode failed: {e}"))?;
    Ok(out.into_inner())
}
