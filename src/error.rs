use folio_layout::LayoutError;
use folio_style::StyleParseError;
use folio_traits::FontError;
use thiserror::Error;

/// Errors surfaced by the document pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Content parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for style '{key}': {source}")]
    Style {
        key: String,
        #[source]
        source: StyleParseError,
    },

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid content tree: {0}")]
    Content(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
