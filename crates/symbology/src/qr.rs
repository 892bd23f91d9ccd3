use crate::{EncodingError, QrGenerator};
use image::Luma;
use qrcode::QrCode;
use waybill_types::RasterImage;

#[derive(Debug, Clone, Copy)]
pub struct QrCodeGenerator {
    /// Pixel size of one QR module.
    pub module_size: u32,
}

impl Default for QrCodeGenerator {
    fn default() -> Self {
        Self { module_size: 4 }
    }
}

impl QrGenerator for QrCodeGenerator {
    fn encode(&self, data: &str) -> Result<RasterImage, EncodingError> {
        if data.is_empty() {
            return Err(EncodingError::Empty);
        }
        let code = QrCode::new(data.as_bytes()).map_err(|e| EncodingError::Qr(e.to_string()))?;
        let size = self.module_size.max(1);
        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(size, size)
            .quiet_zone(true)
            .build();
        let (width, height) = image.dimensions();
        Ok(RasterImage::new(width, height, image.into_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_square_grayscale_image() {
        let generator = QrCodeGenerator::default();
        let image = generator
            .encode("https://track.example/track?code=WB123")
            .unwrap();
        assert!(image.is_consistent());
        assert_eq!(image.width, image.height);
        assert!(image.pixels.iter().any(|p| *p == 0));
        assert!(image.pixels.iter().any(|p| *p == 255));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(QrCodeGenerator::default().encode(""), Err(EncodingError::Empty));
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let huge = "x".repeat(8000);
        assert!(matches!(
            QrCodeGenerator::default().encode(&huge),
            Err(EncodingError::Qr(_))
        ));
    }
}
