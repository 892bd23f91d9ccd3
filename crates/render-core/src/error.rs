use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Rendering cancelled after {0} page(s)")]
    Cancelled(usize),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

/// A failed barcode, QR or watermark draw. Logged and swallowed by the
/// painter; never returned to callers.
#[derive(Error, Debug)]
#[error("Decorative element '{element}' on page {page} was skipped: {source}")]
pub struct DecorativeDrawError {
    pub element: &'static str,
    pub page: usize,
    #[source]
    pub source: RenderError,
}
