//! Projection of overlays from diagram space into pixel geometry.

use crate::measure::TextMeasure;
use kurbo::{Point, Rect};
use wm_core::{ShapeGeometry, ShapeOverlay, TextOverlay, Viewport};

/// Padding around a text overlay's glyph box, in pixels.
pub const TEXT_PADDING: f64 = 5.0;

/// A shape overlay resolved to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelShape {
    Segment { start: Point, end: Point },
    Box(Rect),
    Disc { center: Point, radius: f64 },
    Triangle { apex: Point, left: Point, right: Point },
}

pub fn project_shape(shape: &ShapeOverlay, vp: &Viewport) -> PixelShape {
    let origin = vp.to_pixel(shape.x, shape.y);
    match shape.geometry {
        ShapeGeometry::Line { end_x, end_y } => PixelShape::Segment {
            start: origin,
            end: vp.to_pixel(end_x, end_y),
        },
        ShapeGeometry::Rectangle { width, height } => {
            PixelShape::Box(pixel_box(origin, width, height, vp))
        }
        ShapeGeometry::Circle { radius } => PixelShape::Disc {
            center: origin,
            radius: radius * vp.scale_min(),
        },
        ShapeGeometry::Triangle { width, height } => {
            let w = width * vp.scale_x();
            let h = height * vp.scale_y();
            PixelShape::Triangle {
                apex: Point::new(origin.x + w / 2.0, origin.y),
                left: Point::new(origin.x, origin.y + h),
                right: Point::new(origin.x + w, origin.y + h),
            }
        }
    }
}

/// Pixel box of a width/height shape with its anchor at `origin`.
/// Negative extents are normalized.
pub fn pixel_box(origin: Point, width: f64, height: f64, vp: &Viewport) -> Rect {
    Rect::new(
        origin.x,
        origin.y,
        origin.x + width * vp.scale_x(),
        origin.y + height * vp.scale_y(),
    )
    .abs()
}

/// Width of a text overlay's glyph run: the explicit width when set,
/// measured otherwise.
pub fn text_width(text: &TextOverlay, measure: &dyn TextMeasure) -> f64 {
    text.width
        .unwrap_or_else(|| measure.width(&text.text, text.font_size, text.font_weight))
}

/// Padded hit box of a text overlay. The anchor is the text baseline's
/// left end, so the box extends upward by the font size.
pub fn text_box(text: &TextOverlay, vp: &Viewport, measure: &dyn TextMeasure) -> Rect {
    let anchor = vp.to_pixel(text.x, text.y);
    let w = text_width(text, measure);
    Rect::new(
        anchor.x - TEXT_PADDING,
        anchor.y - text.font_size - TEXT_PADDING,
        anchor.x + w + TEXT_PADDING,
        anchor.y + TEXT_PADDING,
    )
}

/// Inclusive containment; `kurbo::Rect::contains` excludes the far edges.
pub fn rect_contains(rect: Rect, p: Point) -> bool {
    rect.x0 <= p.x && p.x <= rect.x1 && rect.y0 <= p.y && p.y <= rect.y1
}
