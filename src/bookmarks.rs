use crate::error::{PdfCutError, Result};

/// A user-created bookmark. Lives only as long as the document stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub label: String,
    /// 0-based page index
    pub page: usize,
}

impl Bookmark {
    /// Text shown in the sidebar list
    pub fn display(&self) -> String {
        format!("{}  (p.{})", self.label, self.page + 1)
    }
}

#[derive(Debug, Default)]
pub struct BookmarkList {
    items: Vec<Bookmark>,
}

impl BookmarkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suggested label for a bookmark on the 0-based `page`
    pub fn default_label(page: usize) -> String {
        format!("Page {}", page + 1)
    }

    pub fn add(&mut self, label: &str, page: usize, total_pages: usize) -> Result<&Bookmark> {
        let label = label.trim();
        if label.is_empty() {
            return Err(PdfCutError::Bookmark("name must not be empty".to_string()));
        }
        if page >= total_pages {
            return Err(PdfCutError::Bookmark(format!(
                "page {} is outside the document (1-{})",
                page + 1,
                total_pages
            )));
        }

        self.items.push(Bookmark {
            label: label.to_string(),
            page,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
