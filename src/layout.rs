//! Zoom model and the vertical stacking of rendered pages.

pub const DPI_RENDER: f32 = 150.0;
pub const ZOOM_STEP: f32 = 0.1;
pub const ZOOM_MIN: f32 = 0.2;
pub const ZOOM_MAX: f32 = 5.0;
/// Pixels between pages, and around the outside of the stack
pub const PAGE_GAP: f32 = 10.0;
/// Pixels kept free around a page by "fit width" and "fit page"
pub const FIT_MARGIN: f32 = 40.0;
/// Offered in the zoom drop-down, in percent
pub const ZOOM_PRESETS: [u32; 7] = [50, 75, 100, 125, 150, 200, 300];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f32);

impl Default for Zoom {
    fn default() -> Self {
        Zoom(1.0)
    }
}

impl Zoom {
    pub fn factor(&self) -> f32 {
        self.0
    }

    /// Clamp and apply a new factor; returns false when nothing changed
    pub fn set(&mut self, factor: f32) -> bool {
        if !factor.is_finite() {
            return false;
        }
        let factor = factor.clamp(ZOOM_MIN, ZOOM_MAX);
        if (factor - self.0).abs() < 0.001 {
            return false;
        }
        self.0 = factor;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set(self.0 + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set(self.0 - ZOOM_STEP)
    }

    /// Pixels per PDF point at this zoom
    pub fn render_scale(&self) -> f32 {
        DPI_RENDER / 72.0 * self.0
    }

    /// Zoom that makes a page of `page_width` points fill the viewport width
    pub fn fit_width(page_width: f32, viewport_width: f32) -> f32 {
        let page_px = page_width * DPI_RENDER / 72.0;
        (viewport_width - FIT_MARGIN) / page_px
    }

    /// Zoom that makes the whole page visible
    pub fn fit_page(page_size: (f32, f32), viewport: (f32, f32)) -> f32 {
        let fit_w = Self::fit_width(page_size.0, viewport.0);
        let page_h_px = page_size.1 * DPI_RENDER / 72.0;
        let fit_h = (viewport.1 - FIT_MARGIN) / page_h_px;
        fit_w.min(fit_h)
    }

    /// Parse user input such as "125%" or "125" (always percent), or "1.25x" as a factor
    pub fn parse(input: &str) -> Option<f32> {
        let trimmed = input.trim();
        if let Some(factor) = trimmed.strip_suffix(|c: char| c == 'x' || c == 'X') {
            return factor.trim().parse::<f32>().ok().filter(|f| *f > 0.0);
        }
        let percent: f32 = trimmed.trim_end_matches('%').trim().parse().ok()?;
        (percent > 0.0).then(|| percent / 100.0)
    }

    pub fn label(&self) -> String {
        format!("{}%", (self.0 * 100.0).round() as i32)
    }
}

/// Positions of the rendered pages on one tall canvas.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    sizes: Vec<(f32, f32)>,
    tops: Vec<f32>,
    width: f32,
    height: f32,
}

impl PageLayout {
    /// `sizes` are rendered page sizes in pixels, in page order
    pub fn new(sizes: Vec<(f32, f32)>) -> Self {
        let mut tops = Vec::with_capacity(sizes.len());
        let mut y = PAGE_GAP;
        let mut max_w: f32 = 0.0;

        for (w, h) in &sizes {
            tops.push(y);
            y += h + PAGE_GAP;
            max_w = max_w.max(*w);
        }

        Self {
            sizes,
            tops,
            width: (max_w + PAGE_GAP * 2.0).max(1.0),
            height: y.max(1.0),
        }
    }

    /// Layout for pages given in points at the given zoom
    pub fn for_zoom(page_sizes_pt: &[(f32, f32)], zoom: &Zoom) -> Self {
        let scale = zoom.render_scale();
        Self::new(
            page_sizes_pt
                .iter()
                .map(|(w, h)| ((w * scale).round(), (h * scale).round()))
                .collect(),
        )
    }

    pub fn page_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn page_top(&self, index: usize) -> Option<f32> {
        self.tops.get(index).copied()
    }

    /// Index of the last page starting at or above `y`
    pub fn page_at_y(&self, y: f32) -> usize {
        self.tops.iter().rposition(|top| y >= *top).unwrap_or(0)
    }

    /// Page rectangle `(x, y, w, h)` on a canvas `canvas_width` wide, centred horizontally
    pub fn page_rect(&self, index: usize, canvas_width: f32) -> Option<(f32, f32, f32, f32)> {
        let (w, h) = *self.sizes.get(index)?;
        let x = ((canvas_width - w) / 2.0).max(0.0);
        Some((x, self.tops[index], w, h))
    }

    /// Scroll offset that shows `index` just below the top of the viewport
    pub fn scroll_offset_for(&self, index: usize) -> Option<f32> {
        self.page_top(index).map(|top| (top - PAGE_GAP).max(0.0))
    }

    /// Page under the vertical middle of the viewport
    pub fn current_page(&self, scroll_offset: f32, viewport_height: f32) -> usize {
        self.page_at_y(scroll_offset + viewport_height / 2.0)
    }

    /// Pages intersecting the vertical band `[top, bottom]`
    pub fn visible_pages(&self, top: f32, bottom: f32) -> Vec<usize> {
        self.tops
            .iter()
            .zip(&self.sizes)
            .enumerate()
            .filter(|(_, (y, (_, h)))| **y + *h >= top && **y <= bottom)
            .map(|(index, _)| index)
            .collect()
    }
}

/// Keep the same relative scroll position when the canvas height changes
pub fn rescale_offset(offset: f32, old_max: f32, new_max: f32) -> f32 {
    let rel = offset / old_max.max(1.0);
    (rel * new_max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_and_steps() {
        let mut zoom = Zoom::default();
        assert!(zoom.zoom_in());
        assert!((zoom.factor() - 1.1).abs() < 1e-6);

        assert!(zoom.set(50.0));
        assert_eq!(zoom.factor(), ZOOM_MAX);
        assert!(!zoom.zoom_in());

        assert!(zoom.set(0.0));
        assert_eq!(zoom.factor(), ZOOM_MIN);
        assert!(!zoom.zoom_out());
    }

    #[test]
    fn tiny_zoom_changes_are_ignored() {
        let mut zoom = Zoom::default();
        assert!(!zoom.set(1.0005));
        assert!(!zoom.set(f32::NAN));
        assert_eq!(zoom.factor(), 1.0);
    }

    #[test]
    fn render_scale_uses_150_dpi() {
        let zoom = Zoom::default();
        assert!((zoom.render_scale() - 150.0 / 72.0).abs() < 1e-6);
    }

    #[test]
    fn fit_width_and_page() {
        // 72pt wide page renders 150px at 100%
        let zoom = Zoom::fit_width(72.0, 340.0);
        assert!((zoom - 2.0).abs() < 1e-6);

        let zoom = Zoom::fit_page((72.0, 144.0), (340.0, 340.0));
        assert!((zoom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn parse_typed_zoom() {
        assert_eq!(Zoom::parse("125%"), Some(1.25));
        assert_eq!(Zoom::parse(" 80 "), Some(0.8));
        assert_eq!(Zoom::parse("2"), Some(0.02));
        assert_eq!(Zoom::parse("1.5x"), Some(1.5));
        assert_eq!(Zoom::parse("abc"), None);
        assert_eq!(Zoom::parse("-20%"), None);
    }

    #[test]
    fn small_typed_percent_clamps_to_minimum() {
        let mut zoom = Zoom::default();
        assert!(zoom.set(Zoom::parse("2").unwrap()));
        assert_eq!(zoom.label(), "20%");
    }

    #[test]
    fn zoom_label() {
        let mut zoom = Zoom::default();
        zoom.set(1.25);
        assert_eq!(zoom.label(), "125%");
    }

    #[test]
    fn layout_stacks_pages_with_gaps() {
        let layout = PageLayout::new(vec![(100.0, 200.0), (120.0, 50.0)]);
        assert_eq!(layout.page_top(0), Some(10.0));
        assert_eq!(layout.page_top(1), Some(220.0));
        assert_eq!(layout.canvas_size(), (140.0, 280.0));
        assert_eq!(layout.page_rect(0, 140.0), Some((20.0, 10.0, 100.0, 200.0)));
    }

    #[test]
    fn page_lookup_by_offset() {
        let layout = PageLayout::new(vec![(100.0, 200.0); 3]);
        assert_eq!(layout.page_at_y(0.0), 0);
        assert_eq!(layout.page_at_y(215.0), 0);
        assert_eq!(layout.page_at_y(220.0), 1);
        assert_eq!(layout.page_at_y(10_000.0), 2);
        assert_eq!(layout.current_page(200.0, 100.0), 1);
        assert_eq!(layout.scroll_offset_for(2), Some(420.0));
    }

    #[test]
    fn visible_pages_in_band() {
        let layout = PageLayout::new(vec![(100.0, 200.0); 4]);
        assert_eq!(layout.visible_pages(0.0, 100.0), vec![0]);
        assert_eq!(layout.visible_pages(150.0, 450.0), vec![0, 1, 2]);
    }

    #[test]
    fn empty_layout() {
        let layout = PageLayout::new(Vec::new());
        assert_eq!(layout.page_count(), 0);
        assert_eq!(layout.page_at_y(50.0), 0);
        assert_eq!(layout.page_rect(0, 10.0), None);
    }

    #[test]
    fn relative_scroll_survives_rescale() {
        assert_eq!(rescale_offset(50.0, 100.0, 300.0), 150.0);
        assert_eq!(rescale_offset(10.0, 0.0, 300.0), 3000.0);
    }
}
