use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use lopdf::{Document, Object};

use crate::document::PdfDocument;
use crate::error::Result;
use crate::page_range::PageRange;

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub range: PageRange,
    pub pages: u32,
    pub output: PathBuf,
}

/// Build a standalone document holding only the pages in `range`
pub fn extract_range(doc: &PdfDocument, range: &PageRange) -> Result<Document> {
    // Re-validate in case the range was built against a different document
    let range = PageRange::new(range.start(), range.end(), doc.page_count())?;

    let mut new_doc = doc.inner().clone();
    let to_delete: Vec<u32> = doc
        .page_ids()
        .into_iter()
        .map(|(num, _)| num)
        .filter(|num| !range.contains(*num))
        .collect();

    if !to_delete.is_empty() {
        new_doc.delete_pages(&to_delete);
    }

    // Outline entries may point at pages that no longer exist
    drop_outline(&mut new_doc);
    let pruned = new_doc.prune_objects();
    debug!("Pruned {} unreferenced objects", pruned.len());

    Ok(new_doc)
}

/// Write pages `range` of `doc` to `output`.
///
/// The range is checked against the document before anything touches the
/// filesystem, and the file is only created once the whole document has been
/// serialized.
pub fn export_range<P: AsRef<Path>>(
    doc: &PdfDocument,
    range: &PageRange,
    output: P,
) -> Result<ExportSummary> {
    let output = output.as_ref();
    let mut new_doc = extract_range(doc, range)?;

    let mut buffer = Vec::new();
    new_doc.save_to(&mut buffer)?;
    fs::write(output, buffer)?;

    info!(
        "Exported pages {} of {} to {}",
        range,
        doc.path().display(),
        output.display()
    );

    Ok(ExportSummary {
        range: *range,
        pages: range.len(),
        output: output.to_path_buf(),
    })
}

/// Open `input`, parse `spec` against its page count and export.
/// Without an explicit output the default `{stem}_pages_{m}-{n}.pdf` name is used.
pub fn export_file(input: &Path, spec: &str, output: Option<&Path>) -> Result<ExportSummary> {
    let doc = PdfDocument::open(input)?;
    let range = PageRange::parse(spec, doc.page_count())?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => crate::page_range::default_output_path(input, &range),
    };
    export_range(&doc, &range, output)
}

fn drop_outline(doc: &mut Document) {
    let root = match doc.trailer.get(b"Root") {
        Ok(Object::Reference(id)) => *id,
        _ => return,
    };
    if let Ok(Object::Dictionary(catalog)) = doc.get_object_mut(root) {
        catalog.remove(b"Outlines");
    }
}
