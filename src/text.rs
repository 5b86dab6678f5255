use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{PdfCutError, Result};
use crate::search::{count_matches, SearchHits};

/// Extract plain text page by page using pdf-extract.
///
/// This is the text source when Pdfium is not available, so it carries no
/// character positions.
pub fn extract_page_texts(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
        PdfCutError::Text(format!("Error extracting text from {}: {}", filename, e))
    })?;
    debug!("Extracted text of {} pages from {}", pages.len(), filename);
    Ok(pages)
}

/// Count matches per page over previously extracted page texts
pub fn search_page_texts(pages: &[String], query: &str) -> SearchHits {
    let mut hits = SearchHits::new(query);
    if query.is_empty() {
        return hits;
    }
    for (index, text) in pages.iter().enumerate() {
        hits.add_count(index, count_matches(text, query));
    }
    hits
}
