//! Core rendering abstractions for waybill documents.
//!
//! This crate provides what sits between a [`RenderPlan`](waybill_layout::RenderPlan)
//! and a concrete output format:
//! - `Canvas`, the drawing capability every backend implements
//! - `DocumentRenderer` for the page lifecycle of a backend
//! - `PagePainter`, which turns one planned page into canvas calls
//! - `RecordingCanvas` / `RecordingRenderer`, in-memory fakes for tests

mod error;
mod painter;
pub mod recording;
mod traits;
pub mod utils;

pub use error::{DecorativeDrawError, RenderError};
pub use painter::{DocumentAssets, PagePainter};
pub use recording::{DrawCall, RecordingCanvas, RecordingRenderer};
pub use traits::{Canvas, DocumentRenderer, FontFace, Paint, Stroke, TextAlign, TextStyle};
