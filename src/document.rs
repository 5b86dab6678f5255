use std::path::{Path, PathBuf};

use log::info;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfCutError, Result};

/// US Letter in points, used when a page carries no usable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// A PDF opened for structure queries and page-range export.
pub struct PdfDocument {
    doc: Document,
    path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path).map_err(|source| PdfCutError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_document(doc, path);
        info!(
            "Opened {} ({} pages)",
            document.path.display(),
            document.page_count()
        );
        Ok(document)
    }

    pub fn from_document<P: AsRef<Path>>(doc: Document, path: P) -> Self {
        Self {
            doc,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    pub(crate) fn inner(&self) -> &Document {
        &self.doc
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// 1-indexed page numbers with their object ids, in page order
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Width and height in points of the 1-indexed page, honouring inherited MediaBox
    pub fn page_size(&self, page: u32) -> (f32, f32) {
        let Some(id) = self.doc.get_pages().get(&page).copied() else {
            return DEFAULT_PAGE_SIZE;
        };
        media_box(&self.doc, id).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Sizes of every page in points, in page order
    pub fn page_sizes(&self) -> Vec<(f32, f32)> {
        self.page_ids()
            .into_iter()
            .map(|(_, id)| media_box(&self.doc, id).unwrap_or(DEFAULT_PAGE_SIZE))
            .collect()
    }

    /// Metadata from the document info dictionary
    pub fn info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(dict) = self.doc.get_dictionary(*info_ref) {
                info.title = string_entry(dict, b"Title");
                info.author = string_entry(dict, b"Author");
                info.subject = string_entry(dict, b"Subject");
                info.creator = string_entry(dict, b"Creator");
                info.producer = string_entry(dict, b"Producer");
            }
        }

        info.page_count = self.page_count();
        info
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: u32,
}

fn media_box(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    // MediaBox is inheritable, so walk up the page tree until one is found
    for _ in 0..32 {
        if let Ok(obj) = node.get(b"MediaBox") {
            let obj = resolve(doc, obj)?;
            if let Object::Array(values) = obj {
                let nums: Vec<f32> = values.iter().filter_map(number).collect();
                if nums.len() == 4 {
                    let width = (nums[2] - nums[0]).abs();
                    let height = (nums[3] - nums[1]).abs();
                    if width > 0.0 && height > 0.0 {
                        return Some((width, height));
                    }
                }
            }
            return None;
        }

        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => node = doc.get_dictionary(*parent).ok()?,
            _ => return None,
        }
    }

    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn string_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, otherwise PDFDocEncoding treated as Latin-1
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf16_titles() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_pdf_string(&bytes), "Hi");
    }

    #[test]
    fn decodes_latin1_titles() {
        assert_eq!(decode_pdf_string(b"Chapter 1"), "Chapter 1");
        assert_eq!(decode_pdf_string(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }
}
