use crate::{BarcodeGenerator, EncodingError, Symbology};
use barcoders::sym::code128::Code128;
use log::debug;
use waybill_types::RasterImage;

/// Selects Code 128 character set B, which covers printable ASCII.
const CHARSET_B: char = '\u{0181}';

/// Rasterizes linear barcodes, one column block per module.
#[derive(Debug, Clone, Copy)]
pub struct LinearBarcodeGenerator {
    /// Pixel width of one module.
    pub module_width: u32,
    pub height: u32,
    /// Blank modules on each side.
    pub quiet_zone: u32,
}

impl Default for LinearBarcodeGenerator {
    fn default() -> Self {
        Self {
            module_width: 2,
            height: 60,
            quiet_zone: 10,
        }
    }
}

impl LinearBarcodeGenerator {
    fn modules(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        if text.is_empty() {
            return Err(EncodingError::Empty);
        }
        if let Some((position, ch)) = text.char_indices().find(|(_, c)| !(' '..='~').contains(c)) {
            return Err(EncodingError::UnsupportedCharacter { ch, position });
        }
        let data = format!("{}{}", CHARSET_B, text);
        let barcode = Code128::new(data).map_err(|e| EncodingError::Barcode(e.to_string()))?;
        Ok(barcode.encode())
    }

    fn rasterize(&self, modules: &[u8]) -> RasterImage {
        let module_width = self.module_width.max(1) as usize;
        let quiet = self.quiet_zone as usize;
        let width = (modules.len() + 2 * quiet) * module_width;
        let height = self.height.max(1) as usize;

        let mut row = vec![255u8; width];
        for (i, module) in modules.iter().enumerate() {
            if *module == 1 {
                let start = (quiet + i) * module_width;
                row[start..start + module_width].fill(0);
            }
        }
        let pixels = row.repeat(height);
        RasterImage::new(width as u32, height as u32, pixels)
    }
}

impl BarcodeGenerator for LinearBarcodeGenerator {
    fn encode(&self, text: &str, symbology: Symbology) -> Result<RasterImage, EncodingError> {
        let modules = match symbology {
            Symbology::Code128 => self.modules(text)?,
        };
        debug!("Encoded '{}' as {} Code 128 modules.", text, modules.len());
        Ok(self.rasterize(&modules))
    }
}
