use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{PdfCutError, Result};

/// A contiguous, 1-indexed, inclusive range of pages known to fit a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Validate `start..=end` against a document of `total` pages
    pub fn new(start: u32, end: u32, total: u32) -> Result<Self> {
        if total == 0 {
            return Err(PdfCutError::NoPages);
        }
        if start > end {
            return Err(PdfCutError::ReversedRange { start, end });
        }
        if start == 0 || end > total {
            return Err(PdfCutError::InvalidRange { start, end, total });
        }
        Ok(Self { start, end })
    }

    /// Parse "M-N", "N" or "M-end" and validate it against `total`
    pub fn parse(spec: &str, total: u32) -> Result<Self> {
        let spec = spec.trim();
        let bad = || PdfCutError::BadRangeSpec(spec.to_string());

        let (start, end) = match spec.split_once('-') {
            Some((start, end)) => {
                let start = start.trim().parse::<u32>().map_err(|_| bad())?;
                let end = match end.trim() {
                    "end" => total,
                    other => other.parse::<u32>().map_err(|_| bad())?,
                };
                (start, end)
            }
            None => {
                let page = spec.parse::<u32>().map_err(|_| bad())?;
                (page, page)
            }
        };

        Self::new(start, end, total)
    }

    /// Initial range offered when exporting: from the page being viewed to the last page
    pub fn for_dialog(current_page: usize, total: u32) -> Result<Self> {
        let start = (current_page as u32 + 1).clamp(1, total.max(1));
        Self::new(start, total, total)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Always false; a validated range holds at least one page
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Same range as 0-based page indices
    pub fn zero_based(&self) -> RangeInclusive<usize> {
        (self.start - 1) as usize..=(self.end - 1) as usize
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages().contains(&page)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// `{dir}/{stem}_pages_{m}-{n}.pdf`, next to the source document
pub fn default_output_path(source: &Path, range: &PageRange) -> PathBuf {
    default_output_path_for(source, range.start(), range.end())
}

/// Same naming as [`default_output_path`] for values that are not yet validated,
/// as typed into the export dialog.
pub fn default_output_path_for(source: &Path, start: u32, end: u32) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let file_name = format!("{}_pages_{}-{}.pdf", stem, start, end);

    match source.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        let range = PageRange::new(2, 5, 10).unwrap();
        assert_eq!(range.len(), 4);
        assert_eq!(range.pages().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert_eq!(range.zero_based(), 1..=4);
    }

    #[test]
    fn test_single_page_range() {
        let range = PageRange::new(7, 7, 7).unwrap();
        assert_eq!(range.len(), 1);
        assert!(range.contains(7));
        assert!(!range.contains(6));
    }

    #[test]
    fn test_reversed_range() {
        let err = PageRange::new(5, 3, 10).unwrap_err();
        assert!(matches!(err, PdfCutError::ReversedRange { start: 5, end: 3 }));
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(matches!(
            PageRange::new(0, 3, 10),
            Err(PdfCutError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_end_beyond_total_rejected() {
        assert!(matches!(
            PageRange::new(3, 11, 10),
            Err(PdfCutError::InvalidRange { total: 10, .. })
        ));
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(matches!(PageRange::new(1, 1, 0), Err(PdfCutError::NoPages)));
    }

    #[test]
    fn test_parse() {
        assert_eq!(PageRange::parse("3-6", 10).unwrap(), PageRange::new(3, 6, 10).unwrap());
        assert_eq!(PageRange::parse("4", 10).unwrap(), PageRange::new(4, 4, 10).unwrap());
        assert_eq!(PageRange::parse(" 8-end ", 10).unwrap(), PageRange::new(8, 10, 10).unwrap());
        assert!(matches!(PageRange::parse("a-3", 10), Err(PdfCutError::BadRangeSpec(_))));
        assert!(matches!(PageRange::parse("", 10), Err(PdfCutError::BadRangeSpec(_))));
        assert!(PageRange::parse("9-12", 10).is_err());
    }

    #[test]
    fn test_dialog_defaults() {
        let range = PageRange::for_dialog(0, 12).unwrap();
        assert_eq!((range.start(), range.end()), (1, 12));

        let range = PageRange::for_dialog(4, 12).unwrap();
        assert_eq!((range.start(), range.end()), (5, 12));
    }

    #[test]
    fn test_default_output_name() {
        let range = PageRange::new(3, 7, 20).unwrap();
        let path = default_output_path(Path::new("/docs/report.pdf"), &range);
        assert_eq!(path, PathBuf::from("/docs/report_pages_3-7.pdf"));
    }

    #[test]
    fn test_default_output_name_relative() {
        let path = default_output_path_for(Path::new("notes.v2.pdf"), 1, 1);
        assert_eq!(path, PathBuf::from("notes.v2_pages_1-1.pdf"));
    }

    #[test]
    fn test_display() {
        assert_eq!(PageRange::new(2, 9, 9).unwrap().to_string(), "2-9");
    }
}
