use serde::Serialize;

/// Axis-aligned pixel rectangle, half-open: `[x_min, x_max) x [y_min, y_max)`.
///
/// Coordinates may lie outside the image until [`Rect::clamp_to`] is applied,
/// so padded boxes can be built first and clipped afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Rect {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> i32 {
        (self.x_max - self.x_min).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y_max - self.y_min).max(0)
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Zero or negative extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.x_max <= self.x_min || self.y_max <= self.y_min
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }

    pub fn clamp_to(&self, width: u32, height: u32) -> Rect {
        let (w, h) = (width as i32, height as i32);
        Rect {
            x_min: self.x_min.clamp(0, w),
            y_min: self.y_min.clamp(0, h),
            x_max: self.x_max.clamp(0, w),
            y_max: self.y_max.clamp(0, h),
        }
    }

    /// Bounding box of pixel-space points, grown by `pad_x`/`pad_y` on each
    /// side and clamped to the image. Padded extremes are truncated toward zero.
    ///
    /// Returns `None` for an empty point set.
    pub fn padded_bounds(
        points: &[(f64, f64)],
        pad_x: f64,
        pad_y: f64,
        width: u32,
        height: u32,
    ) -> Option<Rect> {
        let (first, rest) = points.split_first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.0, first.1, first.0, first.1);
        for &(x, y) in rest {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Some(Rect {
            x_min: ((min_x - pad_x) as i32).max(0),
            y_min: ((min_y - pad_y) as i32).max(0),
            x_max: ((max_x + pad_x) as i32).min(width as i32),
            y_max: ((max_y + pad_y) as i32).min(height as i32),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_dimensions_and_area() {
        let r = Rect::new(10, 20, 110, 70);
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 50);
        assert_eq!(r.area(), 5000);
        assert!(!r.is_degenerate());
    }

    #[rstest]
    #[case::zero_width(Rect::new(5, 0, 5, 10))]
    #[case::zero_height(Rect::new(0, 5, 10, 5))]
    #[case::inverted(Rect::new(10, 10, 0, 0))]
    fn test_degenerate_rects(#[case] r: Rect) {
        assert!(r.is_degenerate());
        assert_eq!(r.area(), 0);
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 9));
        assert!(!r.contains(10, 5));
        assert!(!r.contains(5, -1));
    }

    #[test]
    fn test_clamp_to_image() {
        let r = Rect::new(-20, -5, 300, 90).clamp_to(200, 100);
        assert_eq!(r, Rect::new(0, 0, 200, 90));
    }

    #[test]
    fn test_padded_bounds_expands_and_clamps() {
        let pts = [(50.0, 40.0), (150.0, 60.0)];
        let r = Rect::padded_bounds(&pts, 24.0, 12.0, 200, 100).unwrap();
        assert_eq!(r, Rect::new(26, 28, 174, 72));

        let r = Rect::padded_bounds(&pts, 100.0, 100.0, 200, 100).unwrap();
        assert_eq!(r, Rect::full(200, 100));
    }

    #[test]
    fn test_padded_bounds_truncates_fractions() {
        let pts = [(10.9, 10.9), (20.9, 20.9)];
        let r = Rect::padded_bounds(&pts, 0.5, 0.5, 100, 100).unwrap();
        // 10.4 -> 10, 21.4 -> 21
        assert_eq!(r, Rect::new(10, 10, 21, 21));
    }

    #[test]
    fn test_padded_bounds_empty_points() {
        assert!(Rect::padded_bounds(&[], 1.0, 1.0, 10, 10).is_none());
    }
}
