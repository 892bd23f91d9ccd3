use thiserror::Error;
use waybill_layout::LayoutError;
use waybill_render_core::RenderError;
use waybill_source::SourceError;

/// Everything `generate_document` and friends can fail with.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("No shipment found for tracking number '{0}'")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The sink broke or generation was cancelled; the document was not finalized.
    #[error("Output stream failed: {0}")]
    Stream(String),

    #[error("Record lookup failed: {0}")]
    Source(#[from] SourceError),

    #[error("Rendering failed: {0}")]
    Render(RenderError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<LayoutError> for DocumentError {
    fn from(e: LayoutError) -> Self {
        DocumentError::Configuration(e.to_string())
    }
}

impl From<RenderError> for DocumentError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io(_) | RenderError::Cancelled(_) => DocumentError::Stream(e.to_string()),
            other => DocumentError::Render(other),
        }
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        DocumentError::Stream(e.to_string())
    }
}

impl From<config::ConfigError> for DocumentError {
    fn from(e: config::ConfigError) -> Self {
        DocumentError::Configuration(e.to_string())
    }
}

impl From<tokio::task::JoinError> for DocumentError {
    fn from(e: tokio::task::JoinError) -> Self {
        DocumentError::Task(e.to_string())
    }
}

impl DocumentError {
    /// True for errors caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DocumentError::NotFound(_) | DocumentError::Configuration(_))
    }
}
