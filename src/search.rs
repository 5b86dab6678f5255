use std::collections::BTreeMap;
use std::ops::Range;

use crate::geometry::PageRect;

/// A single character of a page's text layer with its position in page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGlyph {
    pub ch: char,
    pub rect: PageRect,
}

/// Find non-overlapping occurrences of `needle` in `haystack`.
///
/// Ranges are in characters, not bytes, so they line up with glyph runs.
/// Case folding maps each character to a single lowercase character, which
/// keeps indices stable for multi-byte text.
pub fn find_matches(haystack: &str, needle: &str, case_sensitive: bool) -> Vec<Range<usize>> {
    let fold = |c: char| {
        if case_sensitive {
            c
        } else {
            c.to_lowercase().next().unwrap_or(c)
        }
    };

    let query: Vec<char> = needle.chars().map(fold).collect();
    let text: Vec<char> = haystack.chars().map(fold).collect();
    let mut matches = Vec::new();

    if query.is_empty() || text.len() < query.len() {
        return matches;
    }

    let mut start = 0;
    while start + query.len() <= text.len() {
        if text[start..start + query.len()] == query[..] {
            matches.push(start..start + query.len());
            start += query.len();
        } else {
            start += 1;
        }
    }

    matches
}

/// Count case-insensitive occurrences, for pages that only have plain text
pub fn count_matches(haystack: &str, needle: &str) -> usize {
    find_matches(haystack, needle, false).len()
}

/// Highlight rectangles for every case-insensitive match of `query` in a page.
///
/// A match that wraps across lines yields one rectangle per line.
pub fn highlight_rects(glyphs: &[PageGlyph], query: &str) -> Vec<PageRect> {
    let text: String = glyphs.iter().map(|g| g.ch).collect();
    let mut rects = Vec::new();

    for range in find_matches(&text, query, false) {
        let mut line: Option<PageRect> = None;
        for glyph in &glyphs[range] {
            if glyph.rect.is_empty() {
                continue;
            }
            line = match line {
                Some(current) if same_line(&current, &glyph.rect) => {
                    Some(current.union(&glyph.rect))
                }
                Some(current) => {
                    rects.push(current);
                    Some(glyph.rect)
                }
                None => Some(glyph.rect),
            };
        }
        rects.extend(line);
    }

    rects
}

/// Text of the glyphs whose centre falls inside `clip`, in reading order
pub fn text_in_rect(glyphs: &[PageGlyph], clip: &PageRect) -> String {
    let mut text = String::new();
    let mut previous: Option<PageRect> = None;

    for glyph in glyphs {
        if glyph.rect.is_empty() {
            continue;
        }
        let (cx, cy) = glyph.rect.center();
        if !clip.contains(cx, cy) {
            continue;
        }

        if let Some(prev) = previous {
            if !same_line(&prev, &glyph.rect) && !text.ends_with(char::is_whitespace) {
                text.push('\n');
            }
        }
        text.push(glyph.ch);
        previous = Some(glyph.rect);
    }

    text.trim().to_string()
}

fn same_line(a: &PageRect, b: &PageRect) -> bool {
    let (_, cy) = b.center();
    cy >= a.y0 && cy <= a.y1
}

/// Matches found on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageHits {
    pub count: usize,
    /// Empty when only plain text was available for the page
    pub rects: Vec<PageRect>,
}

/// Search results for a whole document, keyed by 0-based page index
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    query: String,
    pages: BTreeMap<usize, PageHits>,
}

impl SearchHits {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            pages: BTreeMap::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn add_rects(&mut self, page: usize, rects: Vec<PageRect>) {
        if rects.is_empty() {
            return;
        }
        self.pages.insert(
            page,
            PageHits {
                count: rects.len(),
                rects,
            },
        );
    }

    pub fn add_count(&mut self, page: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.pages.insert(
            page,
            PageHits {
                count,
                rects: Vec::new(),
            },
        );
    }

    pub fn total(&self) -> usize {
        self.pages.values().map(|hits| hits.count).sum()
    }

    /// First page with a match, where the viewer scrolls after a search
    pub fn first_page(&self) -> Option<usize> {
        self.pages.keys().next().copied()
    }

    pub fn rects(&self, page: usize) -> &[PageRect] {
        self.pages
            .get(&page)
            .map(|hits| hits.rects.as_slice())
            .unwrap_or(&[])
    }

    pub fn pages(&self) -> impl Iterator<Item = (usize, &PageHits)> {
        self.pages.iter().map(|(page, hits)| (*page, hits))
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Status-bar text after a search
pub fn match_summary(count: usize, query: &str) -> String {
    let noun = if count == 1 { "match" } else { "matches" };
    format!("Found {} {} for \"{}\"", count, noun, query)
}
