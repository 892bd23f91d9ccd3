//! Barcode and QR rasterization.
//!
//! Both generators return an 8-bit grayscale [`RasterImage`] (0 = ink,
//! 255 = paper) which the PDF backend embeds directly.

mod code128;
mod qr;

pub use code128::LinearBarcodeGenerator;
pub use qr::QrCodeGenerator;

use thiserror::Error;
use waybill_types::RasterImage;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("Cannot encode empty text")]
    Empty,
    #[error("Character {ch:?} at position {position} is not encodable")]
    UnsupportedCharacter { ch: char, position: usize },
    #[error("Barcode encoding failed: {0}")]
    Barcode(String),
    #[error("QR encoding failed: {0}")]
    Qr(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Code128,
}

pub trait BarcodeGenerator: Send + Sync {
    fn encode(&self, text: &str, symbology: Symbology) -> Result<RasterImage, EncodingError>;
}

pub trait QrGenerator: Send + Sync {
    fn encode(&self, data: &str) -> Result<RasterImage, EncodingError>;
}
