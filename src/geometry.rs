/// Axis-aligned rectangle in page space: PDF points, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageRect {
    /// Build from any two corners
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub fn union(&self, other: &PageRect) -> PageRect {
        PageRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn intersect(&self, other: &PageRect) -> Option<PageRect> {
        let rect = PageRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        (!rect.is_empty()).then_some(rect)
    }

    /// Multiply every coordinate, e.g. to go from points to pixels
    pub fn scale(&self, factor: f32) -> PageRect {
        PageRect {
            x0: self.x0 * factor,
            y0: self.y0 * factor,
            x1: self.x1 * factor,
            y1: self.y1 * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_corners() {
        let rect = PageRect::new(10.0, 20.0, 0.0, 5.0);
        assert_eq!(rect, PageRect { x0: 0.0, y0: 5.0, x1: 10.0, y1: 20.0 });
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 15.0);
    }

    #[test]
    fn intersection_and_union() {
        let a = PageRect::new(0.0, 0.0, 10.0, 10.0);
        let b = PageRect::new(5.0, 5.0, 20.0, 20.0);
        assert_eq!(a.intersect(&b), Some(PageRect::new(5.0, 5.0, 10.0, 10.0)));
        assert_eq!(a.union(&b), PageRect::new(0.0, 0.0, 20.0, 20.0));

        let far = PageRect::new(50.0, 50.0, 60.0, 60.0);
        assert_eq!(a.intersect(&far), None);
    }

    #[test]
    fn scale_to_pixels() {
        let rect = PageRect::new(1.0, 2.0, 3.0, 4.0).scale(2.0);
        assert_eq!(rect, PageRect::new(2.0, 4.0, 6.0, 8.0));
    }
}
