use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while opening, reading or exporting PDF documents
#[derive(Debug, Error)]
pub enum PdfCutError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Text extraction error: {0}")]
    Text(String),

    #[error("Pages {start}-{end} are out of range (1-{total})")]
    InvalidRange { start: u32, end: u32, total: u32 },

    #[error("'From' must be <= 'To' (got {start} > {end})")]
    ReversedRange { start: u32, end: u32 },

    #[error("Invalid page range '{0}', expected N or M-N")]
    BadRangeSpec(String),

    #[error("Document has no pages")]
    NoPages,

    #[error("Bookmark error: {0}")]
    Bookmark(String),
}

pub type Result<T> = std::result::Result<T, PdfCutError>;
