use std::sync::Arc;

/// An 8-bit grayscale raster, row-major, one byte per pixel.
///
/// Barcode and QR collaborators produce this; the PDF backend embeds it as a
/// `DeviceGray` image without touching any image codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    /// True when the pixel buffer matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize
    }
}
