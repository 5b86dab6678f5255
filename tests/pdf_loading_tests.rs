// Integration tests for PDF loading functionality
// The viewer runs without Pdfium here, so pages are laid out from the document structure
#![cfg(feature = "gui")]

mod common;

use pdfcut::gui::PdfViewer;
use pdfcut::render::Renderer;
use pdfcut::PdfDocument;
use tempfile::tempdir;

fn viewer() -> PdfViewer {
    PdfViewer::with_renderer(Renderer::unavailable())
}

#[test]
fn test_pdf_viewer_initialization() {
    let viewer = viewer();

    assert_eq!(viewer.total_pages(), 0);
    assert!(viewer.current_pdf().is_none());
    assert!(!viewer.rendering_available());
}

#[test]
fn test_pdf_viewer_load_document() {
    let dir = tempdir().unwrap();
    let path = common::write_pdf(dir.path(), "sample.pdf", 4);
    let doc = PdfDocument::open(&path).unwrap();

    let mut viewer = viewer();
    viewer.load_document(&doc);

    assert_eq!(viewer.total_pages(), 4);
    assert_eq!(viewer.current_pdf(), Some(path.as_path()));
    assert_eq!(viewer.current_page(), 0);
}

#[test]
fn test_pdf_viewer_page_navigation() {
    let dir = tempdir().unwrap();
    let path = common::write_pdf(dir.path(), "sample.pdf", 4);
    let doc = PdfDocument::open(&path).unwrap();

    let mut viewer = viewer();
    viewer.load_document(&doc);
    viewer.scroll_to_page(2);
    assert_eq!(viewer.current_page(), 2);

    // Out-of-range pages are ignored
    viewer.scroll_to_page(9);
    assert_eq!(viewer.current_page(), 2);
}

#[test]
fn test_pdf_viewer_zoom_is_clamped() {
    let mut viewer = viewer();
    viewer.set_zoom(50.0);
    assert_eq!(viewer.zoom().label(), "500%");
    viewer.set_zoom(0.01);
    assert_eq!(viewer.zoom().label(), "20%");
}

#[test]
fn test_pdf_viewer_close_document() {
    let dir = tempdir().unwrap();
    let path = common::write_pdf(dir.path(), "sample.pdf", 2);
    let doc = PdfDocument::open(&path).unwrap();

    let mut viewer = viewer();
    viewer.load_document(&doc);
    viewer.close_document();

    assert_eq!(viewer.total_pages(), 0);
    assert!(viewer.current_pdf().is_none());
    assert!(viewer.search_hits().is_empty());
}
