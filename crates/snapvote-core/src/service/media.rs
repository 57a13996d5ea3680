//! ImageProcessor trait for upload normalization and QR rendering.

pub trait ImageProcessor: Send + Sync {
    /// Decode an uploaded file, resize it to the thumbnail size, convert it
    /// to RGBA, and re-encode it as PNG.
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<u8>, String>;

    /// Render `text` as a QR code PNG.
    fn qr_png(&self, text: &str) -> Result<Vec<u8>, String>;
}
