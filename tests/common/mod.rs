pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use std::sync::Arc;
use waybill::source::InMemoryRecordSource;
use waybill::types::ShipmentRecord;
use waybill::{DocumentGenerator, GeneratedDocument, GeneratorConfig};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn from_document(document: GeneratedDocument) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_bytes(document.bytes)
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    pub fn page_text(&self, page_number: u32) -> String {
        self.doc.extract_text(&[page_number]).unwrap_or_default()
    }

    pub fn text(&self) -> String {
        pdf_assertions::extract_text(&self.doc)
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// A generator over an in-memory source holding `records`.
pub fn generator_with(records: Vec<ShipmentRecord>, config: GeneratorConfig) -> DocumentGenerator {
    let source = InMemoryRecordSource::from_records(records);
    DocumentGenerator::new(Arc::new(source), config).expect("default config is valid")
}
