use std::path::Path;

/// Truncates a string to at most `max_chars` characters, marking the cut with "..."
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Extracts the lower-cased file extension from a path
pub fn get_file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Checks if a file is a PDF
pub fn is_pdf(path: &Path) -> bool {
    get_file_extension(path) == "pdf"
}

/// Last path component for titles and status messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("Einführung in PDF", 8), "Einfü...");
    }

    #[test]
    fn recognizes_pdf_extension() {
        assert!(is_pdf(Path::new("/tmp/Report.PDF")));
        assert!(!is_pdf(Path::new("/tmp/notes.txt")));
        assert!(!is_pdf(Path::new("/tmp/noext")));
    }

    #[test]
    fn display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/a/b/c.pdf")), "c.pdf");
    }
}
