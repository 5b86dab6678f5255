// Integration tests for search functionality
// These tests verify that the search logic handles edge cases correctly

use pdfcut::geometry::PageRect;
use pdfcut::search::{count_matches, find_matches, highlight_rects, match_summary, PageGlyph};
use pdfcut::text::search_page_texts;

fn glyphs(text: &str) -> Vec<PageGlyph> {
    text.chars()
        .enumerate()
        .map(|(i, ch)| PageGlyph {
            ch,
            rect: PageRect::new(i as f32 * 6.0, 0.0, (i + 1) as f32 * 6.0, 12.0),
        })
        .collect()
}

#[test]
fn test_search_with_utf8_characters() {
    let text = "Größe und Übersicht";
    let matches = find_matches(text, "übersicht", false);
    assert_eq!(matches, vec![10..19]);
}

#[test]
fn test_search_case_sensitivity() {
    let text = "Hello World hello";
    assert_eq!(find_matches(text, "hello", false).len(), 2);
    assert_eq!(find_matches(text, "hello", true), vec![12..17]);
}

#[test]
fn test_search_non_overlapping() {
    assert_eq!(count_matches("aaaa", "aa"), 2);
    assert_eq!(count_matches("abababa", "aba"), 2);
}

#[test]
fn test_search_empty_query() {
    assert!(find_matches("some text", "", false).is_empty());
    assert!(find_matches("", "query", false).is_empty());
}

#[test]
fn test_search_query_longer_than_text() {
    assert!(find_matches("short", "much longer query", false).is_empty());
}

#[test]
fn test_highlight_rect_covers_match() {
    let rects = highlight_rects(&glyphs("find the needle here"), "NEEDLE");
    assert_eq!(rects, vec![PageRect::new(54.0, 0.0, 90.0, 12.0)]);
}

#[test]
fn test_plain_text_search_per_page() {
    let pages = vec![
        "Invoice number 42".to_string(),
        "nothing to see".to_string(),
        "invoice total, INVOICE date".to_string(),
    ];
    let hits = search_page_texts(&pages, "invoice");

    assert_eq!(hits.total(), 3);
    assert_eq!(hits.first_page(), Some(0));
    let per_page: Vec<(usize, usize)> = hits.pages().map(|(page, h)| (page, h.count)).collect();
    assert_eq!(per_page, vec![(0, 1), (2, 2)]);
}

#[test]
fn test_match_summary_wording() {
    assert_eq!(match_summary(1, "cat"), "Found 1 match for \"cat\"");
    assert_eq!(match_summary(0, "cat"), "Found 0 matches for \"cat\"");
}
