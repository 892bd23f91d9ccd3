//! Streaming PDF backend for waybill documents using lopdf.
//!
//! Pages are emitted as soon as they are painted, so memory use stays flat
//! regardless of how many pages a shipment needs. Only the standard
//! Helvetica faces are used; nothing is embedded except images.

mod canvas;
mod renderer;
mod writer;

pub use canvas::{PdfPageCanvas, to_win_ansi};
pub use renderer::LopdfRenderer;
pub use writer::StreamingPdfWriter;
