mod app;
mod export_dialog;
mod pdf_viewer;
mod theme;
mod utils;

pub use app::PdfCutApp;
pub use pdf_viewer::PdfViewer;
