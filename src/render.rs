use std::cell::OnceCell;
use std::path::Path;

use image::{Rgba, RgbaImage};
use log::{info, warn};
use pdfium_render::prelude::*;

use crate::error::{PdfCutError, Result};
use crate::geometry::PageRect;
use crate::search::{highlight_rects, text_in_rect, PageGlyph, SearchHits};

/// Highlight colour for search hits, blended at `HIGHLIGHT_OPACITY`
const HIGHLIGHT_COLOR: [u8; 3] = [255, 255, 0];
const HIGHLIGHT_OPACITY: f32 = 0.40;
const BORDER_COLOR: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Entry point to Pdfium. Rendering is optional: without the shared library
/// the viewer still lays out pages and searches plain text.
pub struct Renderer {
    pdfium: Option<&'static Pdfium>,
}

impl Renderer {
    /// Bind to Pdfium next to the executable, in the working directory or system-wide.
    /// The binding is made once per thread and shared by every `Renderer` on it.
    pub fn new() -> Self {
        let pdfium = PDFIUM.with(|cell| *cell.get_or_init(load_pdfium));
        Self { pdfium }
    }

    pub fn unavailable() -> Self {
        Self { pdfium: None }
    }

    pub fn is_available(&self) -> bool {
        self.pdfium.is_some()
    }

    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<RenderDocument> {
        let pdfium = self
            .pdfium
            .ok_or_else(|| PdfCutError::Render("Pdfium library not available".to_string()))?;
        let document = pdfium
            .load_pdf_from_file(path.as_ref(), None)
            .map_err(|e| PdfCutError::Render(format!("Error loading PDF with Pdfium: {}", e)))?;
        Ok(RenderDocument { document })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static PDFIUM: OnceCell<Option<&'static Pdfium>> = OnceCell::new();
}

fn load_pdfium() -> Option<&'static Pdfium> {
    match bind_pdfium() {
        Ok(pdfium) => {
            info!("Successfully initialized Pdfium");
            // Documents borrow the library for their whole lifetime; it lives until exit
            Some(Box::leak(Box::new(pdfium)))
        }
        Err(err) => {
            warn!("Failed to initialize Pdfium: {}", err);
            warn!("Page rendering is disabled; export, outline and search still work");
            None
        }
    }
}

fn bind_pdfium() -> std::result::Result<Pdfium, PdfiumError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    if let Some(dir) = exe_dir {
        let dir = format!("{}/", dir.display());
        if let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir.as_str()))
        {
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())?;
    Ok(Pdfium::new(bindings))
}

/// A document opened through Pdfium for rasterizing and glyph queries.
pub struct RenderDocument {
    document: PdfDocument<'static>,
}

impl RenderDocument {
    pub fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<PdfPage<'_>> {
        let page_index = u16::try_from(index)
            .map_err(|_| PdfCutError::Render(format!("Page number too large: {}", index + 1)))?;
        self.document
            .pages()
            .get(page_index)
            .map_err(|e| PdfCutError::Render(format!("Error getting page {}: {}", index + 1, e)))
    }

    /// Page size in points
    pub fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        let page = self.page(index)?;
        Ok((page.width().value, page.height().value))
    }

    pub fn page_sizes(&self) -> Vec<(f32, f32)> {
        (0..self.page_count())
            .map(|index| {
                self.page_size(index)
                    .unwrap_or(crate::document::DEFAULT_PAGE_SIZE)
            })
            .collect()
    }

    /// Rasterize a page at `scale` pixels per point
    pub fn render_page(&self, index: usize, scale: f32) -> Result<RgbaImage> {
        let page = self.page(index)?;
        let width_px = (page.width().value * scale).round().max(1.0) as i32;
        let height_px = (page.height().value * scale).round().max(1.0) as i32;

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfCutError::Render(format!("Error rendering page {}: {}", index + 1, e)))?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec()).ok_or_else(|| {
            PdfCutError::Render(format!("Unexpected bitmap size for page {}", index + 1))
        })
    }

    /// Characters of the page text layer with top-left-origin bounds in points
    pub fn page_glyphs(&self, index: usize) -> Result<Vec<PageGlyph>> {
        let page = self.page(index)?;
        let page_height = page.height().value;
        let text = page
            .text()
            .map_err(|e| PdfCutError::Text(format!("Failed to get text page: {}", e)))?;

        let mut glyphs = Vec::new();
        for glyph in text.chars().iter() {
            let Some(ch) = glyph.unicode_char() else {
                continue;
            };
            // Generated characters (line breaks, spaces) have no usable box
            let rect = match glyph.loose_bounds() {
                Ok(bounds) => PageRect::new(
                    bounds.left().value,
                    page_height - bounds.top().value,
                    bounds.right().value,
                    page_height - bounds.bottom().value,
                ),
                Err(_) => PageRect::default(),
            };
            glyphs.push(PageGlyph { ch, rect });
        }

        Ok(glyphs)
    }

    /// Case-insensitive search across every page
    pub fn search(&self, query: &str) -> SearchHits {
        let mut hits = SearchHits::new(query);
        if query.is_empty() {
            return hits;
        }

        for index in 0..self.page_count() {
            match self.page_glyphs(index) {
                Ok(glyphs) => hits.add_rects(index, highlight_rects(&glyphs, query)),
                Err(e) => warn!("Skipping page {} while searching: {}", index + 1, e),
            }
        }

        hits
    }

    /// Text under `clip` (page points) on the page
    pub fn text_in_clip(&self, index: usize, clip: &PageRect) -> Result<String> {
        let glyphs = self.page_glyphs(index)?;
        Ok(text_in_rect(&glyphs, clip))
    }
}

/// Blend search highlights into a rendered page; `scale` maps points to pixels
pub fn apply_highlights(image: &mut RgbaImage, rects: &[PageRect], scale: f32) {
    let (width, height) = image.dimensions();

    for rect in rects {
        let px = rect.scale(scale);
        let x0 = px.x0.floor().max(0.0) as u32;
        let y0 = px.y0.floor().max(0.0) as u32;
        let x1 = (px.x1.ceil().max(0.0) as u32).min(width);
        let y1 = (px.y1.ceil().max(0.0) as u32).min(height);

        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = image.get_pixel_mut(x, y);
                for (channel, target) in pixel.0.iter_mut().zip(HIGHLIGHT_COLOR) {
                    let blended = *channel as f32 * (1.0 - HIGHLIGHT_OPACITY)
                        + target as f32 * HIGHLIGHT_OPACITY;
                    *channel = blended.round() as u8;
                }
            }
        }
    }
}

/// Blank stand-in used when a page cannot be rasterized
pub fn placeholder_page(width: u32, height: u32) -> RgbaImage {
    let width = width.max(2);
    let height = height.max(2);
    let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    for x in 0..width {
        img.put_pixel(x, 0, BORDER_COLOR);
        img.put_pixel(x, height - 1, BORDER_COLOR);
    }
    for y in 0..height {
        img.put_pixel(0, y, BORDER_COLOR);
        img.put_pixel(width - 1, y, BORDER_COLOR);
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_blends_yellow_inside_rect_only() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        apply_highlights(&mut img, &[PageRect::new(1.0, 1.0, 2.0, 2.0)], 2.0);

        // Blue channel drops to 60% of white, alpha untouched
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 153, 255]);
        assert_eq!(img.get_pixel(3, 3).0, [255, 255, 153, 255]);
        assert_eq!(img.get_pixel(4, 4).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn highlight_is_clipped_to_image() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        apply_highlights(&mut img, &[PageRect::new(-5.0, -5.0, 50.0, 50.0)], 1.0);
        assert_eq!(img.get_pixel(3, 3).0, [102, 102, 0, 255]);
    }

    #[test]
    fn placeholder_has_border() {
        let img = placeholder_page(20, 30);
        assert_eq!(img.dimensions(), (20, 30));
        assert_eq!(*img.get_pixel(0, 15), BORDER_COLOR);
        assert_eq!(*img.get_pixel(10, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn renderers_share_one_binding() {
        let first = Renderer::new();
        let second = Renderer::new();
        match (first.pdfium, second.pdfium) {
            (Some(a), Some(b)) => assert!(std::ptr::eq(a, b)),
            (None, None) => {}
            _ => panic!("binding differs between renderers"),
        }
    }

    #[test]
    fn unavailable_renderer_refuses_to_open() {
        let renderer = Renderer::unavailable();
        assert!(!renderer.is_available());
        assert!(renderer.open("missing.pdf").is_err());
    }
}
