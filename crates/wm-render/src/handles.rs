//! Resize handles for the selected overlay.
//!
//! | Overlay            | Handles                  |
//! |--------------------|--------------------------|
//! | line               | `start`, `end`           |
//! | rectangle/triangle | `nw`, `ne`, `sw`, `se`   |
//! | circle             | `e`, `s`, `w`, `n`       |
//! | text               | `se` (size), `e` (width) |
//!
//! Handles are probed before regular hit testing so a handle sitting on
//! top of another entity still starts a resize.

use crate::measure::TextMeasure;
use crate::project::{PixelShape, project_shape, text_width};
use kurbo::Point;
use smallvec::{SmallVec, smallvec};
use wm_core::{OverlayId, ShapeGeometry, ShapeOverlay, TextOverlay, Viewport, WardleyMap};

/// Half-size (px) of the square around a handle that accepts the pointer.
pub const HANDLE_TOLERANCE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    E,
    S,
    W,
    Start,
    End,
}

impl Handle {
    pub fn name(self) -> &'static str {
        match self {
            Handle::Nw => "nw",
            Handle::Ne => "ne",
            Handle::Sw => "sw",
            Handle::Se => "se",
            Handle::N => "n",
            Handle::E => "e",
            Handle::S => "s",
            Handle::W => "w",
            Handle::Start => "start",
            Handle::End => "end",
        }
    }
}

pub type HandleSet = SmallVec<[(Handle, Point); 4]>;

/// Handle positions in canvas pixels.
pub fn shape_handles(shape: &ShapeOverlay, vp: &Viewport) -> HandleSet {
    match (shape.geometry, project_shape(shape, vp)) {
        (ShapeGeometry::Line { .. }, PixelShape::Segment { start, end }) => {
            smallvec![(Handle::Start, start), (Handle::End, end)]
        }
        (ShapeGeometry::Circle { .. }, PixelShape::Disc { center, radius }) => smallvec![
            (Handle::E, Point::new(center.x + radius, center.y)),
            (Handle::S, Point::new(center.x, center.y + radius)),
            (Handle::W, Point::new(center.x - radius, center.y)),
            (Handle::N, Point::new(center.x, center.y - radius)),
        ],
        (
            ShapeGeometry::Rectangle { width, height } | ShapeGeometry::Triangle { width, height },
            _,
        ) => {
            // Corners of the anchor box as drawn, before any normalization of
            // negative extents, so that each corner maps back to one edge pair.
            let o = vp.to_pixel(shape.x, shape.y);
            let w = width * vp.scale_x();
            let h = height * vp.scale_y();
            smallvec![
                (Handle::Nw, o),
                (Handle::Ne, Point::new(o.x + w, o.y)),
                (Handle::Sw, Point::new(o.x, o.y + h)),
                (Handle::Se, Point::new(o.x + w, o.y + h)),
            ]
        }
        _ => SmallVec::new(),
    }
}

pub fn text_handles(text: &TextOverlay, vp: &Viewport, measure: &dyn TextMeasure) -> HandleSet {
    let anchor = vp.to_pixel(text.x, text.y);
    let right = anchor.x + text_width(text, measure);
    smallvec![
        (Handle::Se, Point::new(right, anchor.y)),
        (Handle::E, Point::new(right, anchor.y - text.font_size / 2.0)),
    ]
}

fn pick(handles: &HandleSet, point: Point) -> Option<Handle> {
    handles
        .iter()
        .find(|(_, at)| {
            (point.x - at.x).abs() < HANDLE_TOLERANCE && (point.y - at.y).abs() < HANDLE_TOLERANCE
        })
        .map(|(handle, _)| *handle)
}

/// Handle of the currently selected text or shape overlay under `point`.
pub fn resize_handle_at(
    map: &WardleyMap,
    vp: &Viewport,
    measure: &dyn TextMeasure,
    point: Point,
) -> Option<(OverlayId, Handle)> {
    let id = map.overlays.selected()?;
    let handles = if let Some(text) = map.overlays.text(id) {
        text_handles(text, vp, measure)
    } else {
        shape_handles(map.overlays.shape(id)?, vp)
    };
    pick(&handles, point).map(|h| (id, h))
}

/// Anchor and geometry a shape takes after dragging `handle` to `point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFrame {
    pub x: f64,
    pub y: f64,
    pub geometry: ShapeGeometry,
}

/// Resize a shape by dragging one of its handles. Corner drags keep the
/// opposite corner fixed; a line handle moves only its own endpoint. The
/// pointer is clamped into the plot first.
pub fn resize_shape(shape: &ShapeOverlay, handle: Handle, point: Point, vp: &Viewport) -> ShapeFrame {
    let norm = vp.to_normalized(point.x, point.y);
    let p = vp.point_to_pixel(norm);
    let unchanged = ShapeFrame {
        x: shape.x,
        y: shape.y,
        geometry: shape.geometry,
    };

    match shape.geometry {
        ShapeGeometry::Line { end_x, end_y } => match handle {
            Handle::Start => ShapeFrame {
                x: norm.x,
                y: norm.y,
                geometry: ShapeGeometry::Line { end_x, end_y },
            },
            Handle::End => ShapeFrame {
                geometry: ShapeGeometry::Line {
                    end_x: norm.x,
                    end_y: norm.y,
                },
                ..unchanged
            },
            _ => unchanged,
        },
        ShapeGeometry::Circle { .. } => {
            let center = vp.to_pixel(shape.x, shape.y);
            ShapeFrame {
                geometry: ShapeGeometry::Circle {
                    radius: center.distance(p) / vp.scale_min(),
                },
                ..unchanged
            }
        }
        ShapeGeometry::Rectangle { width, height } | ShapeGeometry::Triangle { width, height } => {
            let o = vp.to_pixel(shape.x, shape.y);
            let far = Point::new(o.x + width * vp.scale_x(), o.y + height * vp.scale_y());
            let (x, y, left, top, right, bottom) = match handle {
                Handle::Nw => (norm.x, norm.y, p.x, p.y, far.x, far.y),
                Handle::Ne => (shape.x, norm.y, o.x, p.y, p.x, far.y),
                Handle::Sw => (norm.x, shape.y, p.x, o.y, far.x, p.y),
                Handle::Se => (shape.x, shape.y, o.x, o.y, p.x, p.y),
                _ => return unchanged,
            };
            let w = (right - left) / vp.scale_x();
            let h = (bottom - top) / vp.scale_y();
            let geometry = match shape.geometry {
                ShapeGeometry::Triangle { .. } => ShapeGeometry::Triangle { width: w, height: h },
                _ => ShapeGeometry::Rectangle { width: w, height: h },
            };
            ShapeFrame { x, y, geometry }
        }
    }
}

/// Attribute a text handle drag rewrites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextResize {
    FontSize(f64),
    /// Explicit box width in pixels.
    Width(f64),
}

pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MAX_FONT_SIZE: f64 = 72.0;

pub fn resize_text(text: &TextOverlay, handle: Handle, point: Point, vp: &Viewport) -> Option<TextResize> {
    let anchor = vp.to_pixel(text.x, text.y);
    match handle {
        Handle::Se => {
            let size = (anchor.distance(point) / 5.0).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            Some(TextResize::FontSize(size.round()))
        }
        Handle::E => Some(TextResize::Width((point.x - anchor.x).max(0.0))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::ApproxMeasure;
    use pretty_assertions::assert_eq;

    fn vp() -> Viewport {
        Viewport::new(1100.0, 1100.0)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn dims(g: ShapeGeometry) -> (f64, f64) {
        match g {
            ShapeGeometry::Rectangle { width, height } | ShapeGeometry::Triangle { width, height } => {
                (width, height)
            }
            ShapeGeometry::Circle { radius } => (radius, radius),
            ShapeGeometry::Line { end_x, end_y } => (end_x, end_y),
        }
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> ShapeOverlay {
        ShapeOverlay::new(
            OverlayId::intern("r"),
            x,
            y,
            ShapeGeometry::Rectangle {
                width: w,
                height: h,
            },
        )
    }

    #[test]
    fn handle_names() {
        let names: Vec<_> = [Handle::Nw, Handle::Se, Handle::N, Handle::Start]
            .into_iter()
            .map(Handle::name)
            .collect();
        assert_eq!(names, vec!["nw", "se", "n", "start"]);
    }

    #[test]
    fn circle_handles_sit_on_cardinal_points() {
        let circle = ShapeOverlay::new(
            OverlayId::intern("c"),
            0.5,
            0.5,
            ShapeGeometry::Circle { radius: 0.1 },
        );
        let handles = shape_handles(&circle, &vp());
        let names: Vec<_> = handles.iter().map(|(h, _)| h.name()).collect();
        assert_eq!(names, vec!["e", "s", "w", "n"]);
        assert_eq!(handles[1].1, Point::new(550.0, 650.0));
    }

    #[test]
    fn selected_rectangle_exposes_corner_handle() {
        let mut map = WardleyMap::default();
        let mut r = rect(0.2, 0.8, 0.2, 0.2);
        r.selected = true;
        map.overlays.shapes.push(r);
        // se corner: (250 + 200, 250 + 200)
        let hit = resize_handle_at(&map, &vp(), &ApproxMeasure::default(), Point::new(455.0, 445.0));
        assert_eq!(hit, Some((OverlayId::intern("r"), Handle::Se)));
        let miss = resize_handle_at(&map, &vp(), &ApproxMeasure::default(), Point::new(458.0, 450.0));
        assert_eq!(miss, None);
    }

    #[test]
    fn unselected_overlays_have_no_active_handles() {
        let mut map = WardleyMap::default();
        map.overlays.shapes.push(rect(0.2, 0.8, 0.2, 0.2));
        assert_eq!(
            resize_handle_at(&map, &vp(), &ApproxMeasure::default(), Point::new(250.0, 250.0)),
            None
        );
    }

    #[test]
    fn nw_drag_keeps_se_corner_fixed() {
        let r = rect(0.2, 0.8, 0.2, 0.2);
        let frame = resize_shape(&r, Handle::Nw, Point::new(150.0, 150.0), &vp());
        assert!(close(frame.x, 0.1) && close(frame.y, 0.9));
        assert!(matches!(frame.geometry, ShapeGeometry::Rectangle { .. }));
        let (w, h) = dims(frame.geometry);
        assert!(close(w, 0.3) && close(h, 0.3));
    }

    #[test]
    fn ne_and_sw_drags() {
        let r = rect(0.2, 0.8, 0.2, 0.2);
        let ne = resize_shape(&r, Handle::Ne, Point::new(550.0, 150.0), &vp());
        assert!(close(ne.x, 0.2) && close(ne.y, 0.9));
        let (w, h) = dims(ne.geometry);
        assert!(close(w, 0.3) && close(h, 0.3));

        let sw = resize_shape(&r, Handle::Sw, Point::new(150.0, 550.0), &vp());
        assert!(close(sw.x, 0.1) && close(sw.y, 0.8));
        let (w, h) = dims(sw.geometry);
        assert!(close(w, 0.3) && close(h, 0.3));
    }

    #[test]
    fn triangle_resize_keeps_its_kind() {
        let tri = ShapeOverlay::new(
            OverlayId::intern("t"),
            0.2,
            0.8,
            ShapeGeometry::Triangle {
                width: 0.2,
                height: 0.2,
            },
        );
        let frame = resize_shape(&tri, Handle::Se, Point::new(350.0, 350.0), &vp());
        assert!(matches!(frame.geometry, ShapeGeometry::Triangle { .. }));
        let (w, h) = dims(frame.geometry);
        assert!(close(w, 0.1) && close(h, 0.1));
    }

    #[test]
    fn line_endpoints_move_independently() {
        let line = ShapeOverlay::new(
            OverlayId::intern("l"),
            0.1,
            0.1,
            ShapeGeometry::Line {
                end_x: 0.9,
                end_y: 0.9,
            },
        );
        let end = resize_shape(&line, Handle::End, Point::new(550.0, 550.0), &vp());
        assert_eq!((end.x, end.y), (0.1, 0.1));
        assert_eq!(
            end.geometry,
            ShapeGeometry::Line {
                end_x: 0.5,
                end_y: 0.5
            }
        );
        let start = resize_shape(&line, Handle::Start, Point::new(-100.0, 2000.0), &vp());
        assert_eq!((start.x, start.y), (0.0, 0.0));
    }

    #[test]
    fn circle_radius_follows_pointer_distance() {
        let circle = ShapeOverlay::new(
            OverlayId::intern("c"),
            0.5,
            0.5,
            ShapeGeometry::Circle { radius: 0.1 },
        );
        let frame = resize_shape(&circle, Handle::N, Point::new(550.0, 250.0), &vp());
        let (r, _) = dims(frame.geometry);
        assert!(close(r, 0.3));
    }

    #[test]
    fn text_se_handle_sets_clamped_font_size() {
        let text = TextOverlay::new(OverlayId::intern("t"), "Hi", 0.5, 0.5);
        let anchor = vp().to_pixel(0.5, 0.5);
        assert_eq!(
            resize_text(&text, Handle::Se, Point::new(anchor.x + 120.0, anchor.y), &vp()),
            Some(TextResize::FontSize(24.0))
        );
        assert_eq!(
            resize_text(&text, Handle::Se, Point::new(anchor.x + 1.0, anchor.y), &vp()),
            Some(TextResize::FontSize(8.0))
        );
        assert_eq!(
            resize_text(&text, Handle::Se, Point::new(anchor.x + 1000.0, anchor.y), &vp()),
            Some(TextResize::FontSize(72.0))
        );
        assert_eq!(
            resize_text(&text, Handle::E, Point::new(anchor.x - 30.0, anchor.y), &vp()),
            Some(TextResize::Width(0.0))
        );
        assert_eq!(resize_text(&text, Handle::Nw, anchor, &vp()), None);
    }

    #[test]
    fn text_handles_follow_measured_width() {
        let text = TextOverlay::new(OverlayId::intern("t"), "abcde", 0.5, 0.5);
        let handles = text_handles(&text, &vp(), &ApproxMeasure::default());
        // 5 chars × 16 px × 0.6 = 48 px
        assert_eq!(handles[0], (Handle::Se, Point::new(598.0, 550.0)));
        assert_eq!(handles[1], (Handle::E, Point::new(598.0, 542.0)));
    }
}
