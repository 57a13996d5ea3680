//! Image processing: upload normalization and QR rendering.

pub mod qr;
pub mod thumbnail;

use snapvote_core::service::media::ImageProcessor;

/// `ImageProcessor` backed by the `image` and `qrcode` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngImageProcessor;

impl PngImageProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl ImageProcessor for PngImageProcessor {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, String> {
        thumbnail::normalize_to_png(bytes)
    }

    fn qr_png(&self, text: &str) -> Result<Vec<u8>, String> {
        qr::render_png(text)
    }
}
