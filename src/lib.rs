//! PDF Cutter: browse a PDF and cut a contiguous page range out of it.

pub mod bookmarks;
pub mod document;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod outline;
pub mod page_range;
pub mod render;
pub mod search;
pub mod settings;
pub mod text;

#[cfg(feature = "gui")]
pub mod gui;

pub use document::PdfDocument;
pub use error::{PdfCutError, Result};
pub use export::{export_range, ExportSummary};
pub use page_range::{default_output_path, PageRange};
