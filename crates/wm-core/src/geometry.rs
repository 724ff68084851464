//! Conversions between diagram space and canvas pixels.
//!
//! Diagram space is `[0,1] × [0,1]` with `y = 1` at the top. The canvas
//! keeps a fixed margin on every side; the remaining area is the plot.
//!
//! ```text
//!  (0,0) ┌──────────────────────────┐
//!        │  M                       │
//!        │   ┌──────────────────┐   │   y = 1
//!        │   │       plot       │   │
//!        │   └──────────────────┘   │   y = 0
//!        │  x = 0            x = 1  │
//!        └──────────────────────────┘ (W,H)
//! ```

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Canvas margin in pixels on each side.
pub const MARGIN: f64 = 50.0;

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 1000.0,
        }
    }
}

impl Viewport {
    /// Both sides must exceed `2 * MARGIN`, otherwise the plot area is empty
    /// and [`to_normalized`](Self::to_normalized) is undefined. Use
    /// [`try_new`](Self::try_new) for sizes from outside.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `None` unless both sides leave a non-empty plot area.
    pub fn try_new(width: f64, height: f64) -> Option<Self> {
        let vp = Self::new(width, height);
        (vp.scale_x() > 0.0 && vp.scale_y() > 0.0).then_some(vp)
    }

    /// Pixel width of the plot area; one diagram unit along x.
    pub fn scale_x(&self) -> f64 {
        self.width - 2.0 * MARGIN
    }

    /// Pixel height of the plot area; one diagram unit along y.
    pub fn scale_y(&self) -> f64 {
        self.height - 2.0 * MARGIN
    }

    /// Scale for lengths that must stay isotropic (circle radii).
    pub fn scale_min(&self) -> f64 {
        self.scale_x().min(self.scale_y())
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> Point {
        Point::new(
            MARGIN + x * self.scale_x(),
            MARGIN + (1.0 - y) * self.scale_y(),
        )
    }

    pub fn point_to_pixel(&self, p: Point) -> Point {
        self.to_pixel(p.x, p.y)
    }

    /// Inverse of [`to_pixel`](Self::to_pixel), clamped into `[0,1]`.
    pub fn to_normalized(&self, px: f64, py: f64) -> Point {
        let (x, y) = self.to_normalized_unclamped(px, py);
        Point::new(clamp01(x), clamp01(y))
    }

    fn to_normalized_unclamped(&self, px: f64, py: f64) -> (f64, f64) {
        (
            (px - MARGIN) / self.scale_x(),
            1.0 - (py - MARGIN) / self.scale_y(),
        )
    }
}

pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Distance from `p` to the segment `a`–`b`, using the clamped projection.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Whether `p` lies inside (or on an edge of) triangle `a b c`.
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    fn cross(o: Point, u: Point, v: Point) -> f64 {
        let ou: Vec2 = u - o;
        let ov: Vec2 = v - o;
        ou.cross(ov)
    }
    let d1 = cross(p, a, b);
    let d2 = cross(p, b, c);
    let d3 = cross(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn pixel_roundtrip_across_sizes() {
        for vp in [
            Viewport::default(),
            Viewport::new(800.0, 600.0),
            Viewport::new(333.0, 1777.0),
        ] {
            for (x, y) in [(0.0, 0.0), (1.0, 1.0), (0.25, 0.8), (0.5, 0.5)] {
                let px = vp.to_pixel(x, y);
                let back = vp.to_normalized(px.x, px.y);
                assert!(close(back.x, x) && close(back.y, y), "{vp:?} ({x},{y})");
            }
        }
    }

    #[test]
    fn canvas_must_exceed_the_margins() {
        assert_eq!(Viewport::try_new(101.0, 400.0), Some(Viewport::new(101.0, 400.0)));
        assert_eq!(Viewport::try_new(100.0, 400.0), None);
        assert_eq!(Viewport::try_new(400.0, 40.0), None);
        assert_eq!(Viewport::try_new(f64::NAN, 400.0), None);
    }

    #[test]
    fn top_of_value_chain_is_top_of_canvas() {
        let vp = Viewport::new(1100.0, 700.0);
        assert_eq!(vp.to_pixel(0.0, 1.0), Point::new(50.0, 50.0));
        assert_eq!(vp.to_pixel(1.0, 0.0), Point::new(1050.0, 650.0));
    }

    #[test]
    fn to_normalized_clamps_outside_points() {
        let vp = Viewport::default();
        let p = vp.to_normalized(-400.0, 5000.0);
        assert_eq!(p, Point::new(0.0, 0.0));
        let p = vp.to_normalized(9000.0, -20.0);
        assert_eq!(p, Point::new(1.0, 1.0));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(close(distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0));
        assert!(close(distance_to_segment(Point::new(-3.0, 4.0), a, b), 5.0));
        assert!(close(distance_to_segment(Point::new(2.0, 2.0), a, a), 8f64.sqrt()));
    }

    #[test]
    fn triangle_containment() {
        let a = Point::new(50.0, 0.0);
        let b = Point::new(0.0, 100.0);
        let c = Point::new(100.0, 100.0);
        assert!(point_in_triangle(Point::new(50.0, 50.0), a, b, c));
        assert!(point_in_triangle(Point::new(50.0, 100.0), a, b, c));
        assert!(!point_in_triangle(Point::new(5.0, 10.0), a, b, c));
    }
}
