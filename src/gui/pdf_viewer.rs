use std::collections::HashMap;
use std::path::{Path, PathBuf};

use egui::{pos2, vec2, Color32, ColorImage, Context, Pos2, Rect, Sense, Stroke, TextureHandle, Ui};
use image::RgbaImage;
use log::{info, warn};

use crate::document::PdfDocument;
use crate::geometry::PageRect;
use crate::layout::{rescale_offset, PageLayout, Zoom};
use crate::render::{apply_highlights, placeholder_page, RenderDocument, Renderer};
use crate::search::SearchHits;
use crate::text;

use super::theme;

/// Selections smaller than this (in pixels) are treated as clicks
const MIN_SELECTION: f32 = 4.0;

/// Continuous-scroll PDF viewer: pages stacked vertically, rendered with Pdfium
pub struct PdfViewer {
    renderer: Renderer,
    document: Option<ViewedDocument>,
    zoom: Zoom,
    layout: PageLayout,
    textures: HashMap<usize, PageTexture>,
    hits: SearchHits,
    current_page: usize,
    pending_scroll: Option<f32>,
    scroll_offset: f32,
    viewport_size: egui::Vec2,
    selection: Option<(Pos2, Pos2)>,
}

struct ViewedDocument {
    path: PathBuf,
    raster: Option<RenderDocument>,
    /// Page sizes in points
    page_sizes: Vec<(f32, f32)>,
    /// Plain text per page, extracted on first search when Pdfium is unavailable
    page_texts: Option<Vec<String>>,
}

struct PageTexture {
    handle: TextureHandle,
    scale: f32,
}

impl PdfViewer {
    pub fn new() -> Self {
        Self::with_renderer(Renderer::new())
    }

    pub fn with_renderer(renderer: Renderer) -> Self {
        Self {
            renderer,
            document: None,
            zoom: Zoom::default(),
            layout: PageLayout::default(),
            textures: HashMap::new(),
            hits: SearchHits::default(),
            current_page: 0,
            pending_scroll: None,
            scroll_offset: 0.0,
            viewport_size: vec2(800.0, 600.0),
            selection: None,
        }
    }

    pub fn rendering_available(&self) -> bool {
        self.renderer.is_available()
    }

    /// Show `doc` from its first page. Falls back to blank pages sized from
    /// the document structure when Pdfium cannot open the file.
    pub fn load_document(&mut self, doc: &PdfDocument) {
        let raster = if self.renderer.is_available() {
            match self.renderer.open(doc.path()) {
                Ok(raster) => Some(raster),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            }
        } else {
            None
        };

        let page_sizes = match &raster {
            Some(raster) if raster.page_count() == doc.page_count() as usize => raster.page_sizes(),
            _ => doc.page_sizes(),
        };

        info!(
            "Viewing {} ({} pages, rendering {})",
            doc.path().display(),
            page_sizes.len(),
            if raster.is_some() { "on" } else { "off" }
        );

        self.document = Some(ViewedDocument {
            path: doc.path().to_path_buf(),
            raster,
            page_sizes,
            page_texts: None,
        });
        self.hits = SearchHits::default();
        self.selection = None;
        self.relayout();
        self.scroll_to_page(0);
    }

    pub fn close_document(&mut self) {
        self.document = None;
        self.hits = SearchHits::default();
        self.textures.clear();
        self.layout = PageLayout::default();
        self.current_page = 0;
        self.selection = None;
    }

    pub fn current_pdf(&self) -> Option<&Path> {
        self.document.as_ref().map(|doc| doc.path.as_path())
    }

    pub fn total_pages(&self) -> usize {
        self.document
            .as_ref()
            .map(|doc| doc.page_sizes.len())
            .unwrap_or(0)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn search_hits(&self) -> &SearchHits {
        &self.hits
    }

    fn relayout(&mut self) {
        let sizes = self
            .document
            .as_ref()
            .map(|doc| doc.page_sizes.as_slice())
            .unwrap_or(&[]);
        self.layout = PageLayout::for_zoom(sizes, &self.zoom);
        self.textures.clear();
    }

    /// Scroll so the page's top edge sits just below the viewport top
    pub fn scroll_to_page(&mut self, index: usize) {
        if let Some(offset) = self.layout.scroll_offset_for(index) {
            self.pending_scroll = Some(offset);
            self.current_page = index;
        }
    }

    pub fn set_zoom(&mut self, factor: f32) {
        let old_max = self.max_scroll();
        if !self.zoom.set(factor) {
            return;
        }
        self.relayout();
        self.pending_scroll = Some(rescale_offset(self.scroll_offset, old_max, self.max_scroll()));
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.factor() + crate::layout::ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.factor() - crate::layout::ZOOM_STEP);
    }

    /// Zoom so the first page fills the viewport width
    pub fn fit_width(&mut self) {
        if let Some(&(width, _)) = self.first_page_size() {
            self.set_zoom(Zoom::fit_width(width, self.viewport_size.x));
        }
    }

    /// Zoom so the first page is entirely visible
    pub fn fit_page(&mut self) {
        if let Some(&size) = self.first_page_size() {
            let viewport = (self.viewport_size.x, self.viewport_size.y);
            self.set_zoom(Zoom::fit_page(size, viewport));
        }
    }

    fn first_page_size(&self) -> Option<&(f32, f32)> {
        self.document.as_ref().and_then(|doc| doc.page_sizes.first())
    }

    fn max_scroll(&self) -> f32 {
        (self.layout.canvas_size().1 - self.viewport_size.y).max(1.0)
    }

    /// Highlight every match of `query` and jump to the first page with one.
    /// Returns the number of matches.
    pub fn search(&mut self, query: &str) -> usize {
        self.hits = SearchHits::default();
        self.textures.clear();

        let Some(doc) = self.document.as_mut() else {
            return 0;
        };
        if query.is_empty() {
            return 0;
        }

        self.hits = match &doc.raster {
            Some(raster) => raster.search(query),
            None => {
                if doc.page_texts.is_none() {
                    match text::extract_page_texts(&doc.path) {
                        Ok(pages) => doc.page_texts = Some(pages),
                        Err(e) => warn!("{}", e),
                    }
                }
                let pages = doc.page_texts.as_deref().unwrap_or(&[]);
                text::search_page_texts(pages, query)
            }
        };

        if let Some(first) = self.hits.first_page() {
            self.scroll_to_page(first);
        }
        self.hits.total()
    }

    pub fn clear_search(&mut self) {
        self.hits = SearchHits::default();
        self.textures.clear();
    }

    /// Draw the pages; returns a status message when the user copied text
    pub fn show(&mut self, ui: &mut Ui) -> Option<String> {
        if self.document.is_none() {
            self.show_welcome(ui);
            return None;
        }

        // Ctrl+wheel arrives as a zoom delta
        let hovered = ui.rect_contains_pointer(ui.max_rect());
        let zoom_delta = ui.input(|i| i.zoom_delta());
        if hovered && zoom_delta > 1.0 {
            self.zoom_in();
        } else if hovered && zoom_delta < 1.0 {
            self.zoom_out();
        }

        let mut scroll_area = egui::ScrollArea::both()
            .id_source("pdf_pages")
            .auto_shrink([false; 2])
            .drag_to_scroll(false);
        if let Some(offset) = self.pending_scroll.take() {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let output = scroll_area.show_viewport(ui, |ui, viewport| self.paint_pages(ui, viewport));

        self.scroll_offset = output.state.offset.y;
        self.viewport_size = output.inner_rect.size();
        self.current_page = self
            .layout
            .current_page(self.scroll_offset, self.viewport_size.y)
            .min(self.total_pages().saturating_sub(1));

        output.inner
    }

    fn paint_pages(&mut self, ui: &mut Ui, viewport: Rect) -> Option<String> {
        let (layout_w, layout_h) = self.layout.canvas_size();
        let canvas_w = layout_w.max(ui.available_width());
        let (response, painter) = ui.allocate_painter(vec2(canvas_w, layout_h), Sense::drag());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, theme::CANVAS_BG);

        let visible = self.layout.visible_pages(viewport.min.y, viewport.max.y);
        // Keep only the textures around the visible pages
        let keep = visible.first().copied().unwrap_or(0).saturating_sub(1)
            ..=visible.last().copied().unwrap_or(0) + 1;
        self.textures.retain(|index, _| keep.contains(index));

        for &index in &visible {
            let Some((x, y, w, h)) = self.layout.page_rect(index, canvas_w) else {
                continue;
            };
            let rect = Rect::from_min_size(origin + vec2(x, y), vec2(w, h));

            painter.rect_filled(rect.translate(vec2(3.0, 3.0)), 0.0, theme::PAGE_SHADOW);
            painter.rect_stroke(rect.expand(1.0), 0.0, Stroke::new(1.0, theme::PAGE_BORDER));

            self.ensure_texture(ui.ctx(), index);
            match self.textures.get(&index) {
                Some(texture) => painter.image(
                    texture.handle.id(),
                    rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                ),
                None => painter.rect_filled(rect, 0.0, Color32::WHITE),
            };
        }

        // Rubber-band selection, kept in canvas coordinates
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let start = (pos - origin).to_pos2();
                self.selection = Some((start, start));
            }
        }
        if response.dragged() {
            if let (Some(selection), Some(pos)) =
                (self.selection.as_mut(), response.interact_pointer_pos())
            {
                selection.1 = (pos - origin).to_pos2();
            }
        }

        if let Some((start, end)) = self.selection {
            let band = Rect::from_two_pos(start, end).translate(origin.to_vec2());
            painter.rect_filled(band, 0.0, theme::selection_fill());
            painter.rect_stroke(band, 0.0, Stroke::new(1.0, theme::SELECTION_STROKE));
        }

        if response.drag_released() {
            let copied = self
                .selection
                .take()
                .and_then(|(start, end)| self.copy_selection(Rect::from_two_pos(start, end), canvas_w));
            if let Some(text) = copied {
                let message = format!("Copied {} characters", text.chars().count());
                ui.ctx().output_mut(|o| o.copied_text = text);
                return Some(message);
            }
        }

        None
    }

    /// Text under the selection on the first page it touches
    fn copy_selection(&self, selection: Rect, canvas_w: f32) -> Option<String> {
        if selection.width() < MIN_SELECTION || selection.height() < MIN_SELECTION {
            return None;
        }
        let raster = self.document.as_ref()?.raster.as_ref()?;
        let scale = self.zoom.render_scale();

        for index in 0..self.layout.page_count() {
            let (x, y, w, h) = self.layout.page_rect(index, canvas_w)?;
            let page = Rect::from_min_size(pos2(x, y), vec2(w, h));
            let overlap = selection.intersect(page);
            if overlap.width() <= 0.0 || overlap.height() <= 0.0 {
                continue;
            }

            let local = overlap.translate(-page.min.to_vec2());
            let clip = PageRect::new(local.min.x, local.min.y, local.max.x, local.max.y)
                .scale(1.0 / scale);
            match raster.text_in_clip(index, &clip) {
                Ok(text) if !text.is_empty() => return Some(text),
                Ok(_) => {}
                Err(e) => warn!("{}", e),
            }
        }

        None
    }

    fn ensure_texture(&mut self, ctx: &Context, index: usize) {
        let scale = self.zoom.render_scale();
        if let Some(texture) = self.textures.get(&index) {
            if (texture.scale - scale).abs() < f32::EPSILON {
                return;
            }
        }
        let Some(doc) = &self.document else {
            return;
        };

        let image = match &doc.raster {
            Some(raster) => match raster.render_page(index, scale) {
                Ok(mut image) => {
                    apply_highlights(&mut image, self.hits.rects(index), scale);
                    image
                }
                Err(e) => {
                    warn!("{}", e);
                    self.fallback_image(index)
                }
            },
            None => self.fallback_image(index),
        };

        let size = [image.width() as usize, image.height() as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        let handle = ctx.load_texture(
            format!("pdf_page_{}", index),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(index, PageTexture { handle, scale });
    }

    fn fallback_image(&self, index: usize) -> RgbaImage {
        let (_, _, w, h) = self
            .layout
            .page_rect(index, 0.0)
            .unwrap_or((0.0, 0.0, 612.0, 792.0));
        placeholder_page(w as u32, h as u32)
    }

    fn show_welcome(&self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.heading("PDF Cutter");
            ui.add_space(20.0);
            ui.label("Open a PDF (Ctrl+O) or drop one onto this window.");

            if !self.renderer.is_available() {
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new("⚠ PDF Rendering Unavailable")
                        .color(Color32::from_rgb(200, 120, 0))
                        .strong(),
                );
                ui.label(
                    egui::RichText::new(
                        "Pdfium library could not be loaded. Pages are shown as blank sheets.",
                    )
                    .small(),
                );
                ui.label(
                    egui::RichText::new("Export, bookmarks and text search still work.").small(),
                );
            }
        });
    }
}

impl Default for PdfViewer {
    fn default() -> Self {
        Self::new()
    }
}
