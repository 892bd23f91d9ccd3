//! Shipment waybill PDF generation.
//!
//! A [`DocumentGenerator`] looks a shipment up by tracking number, plans its
//! pages with `waybill-layout`, paints them through the canvas capability of
//! `waybill-render-core` and streams the result as PDF.
//!
//! ```no_run
//! use std::sync::Arc;
//! use waybill::{DocumentGenerator, GeneratorConfig};
//! use waybill::source::InMemoryRecordSource;
//! use waybill::types::ShipmentRecord;
//!
//! # async fn run() -> Result<(), waybill::DocumentError> {
//! let source = InMemoryRecordSource::from_records([ShipmentRecord::new("WB1001")]);
//! let config = GeneratorConfig::default();
//! let geometry = config.page;
//! let generator = DocumentGenerator::new(Arc::new(source), config)?;
//! let document = generator.generate_document("wb1001", &geometry).await?;
//! std::fs::write(&document.filename, &document.bytes).ok();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generator;

pub use config::{GeneratorConfig, TrackingConfig};
pub use error::DocumentError;
pub use generator::{
    CancellationFlag, DocumentGenerator, GeneratedDocument, RenderOutcome, WrittenDocument,
    render_document, sanitize_filename, tracking_url,
};

pub use waybill_layout as layout;
pub use waybill_render_core as render;
pub use waybill_render_lopdf as pdf;
pub use waybill_source as source;
pub use waybill_symbology as symbology;
pub use waybill_types as types;
