//! Overlay store: copy-on-write mutations over [`Overlays`].
//!
//! Each operation takes the current collection and returns a new one; the
//! input is never touched, so the previous value can sit in the undo
//! history unchanged. Operations addressing an unknown id return an
//! unchanged copy. Positions written here are clamped into `[0,1]`.

use kurbo::{Point, Vec2};
use wm_core::geometry::clamp01;
use wm_core::{
    FontWeight, Overlay, OverlayId, OverlayKind, Overlays, ShapeGeometry,
};

// ─── Patches ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub opacity: Option<f64>,
    /// `Some(None)` clears an explicit width.
    pub width: Option<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconPatch {
    pub icon: Option<String>,
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    pub src: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Ignored unless it is the same kind of geometry the shape already has.
    pub geometry: Option<ShapeGeometry>,
    pub stroke_color: Option<String>,
    pub fill_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub filled: Option<bool>,
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathPatch {
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

// ─── Operations ──────────────────────────────────────────────────────────

/// An id of `kind` not used by any overlay in `overlays`.
pub fn fresh_id(overlays: &Overlays, kind: OverlayKind) -> OverlayId {
    loop {
        let id = OverlayId::with_prefix(kind.prefix());
        if !overlays.contains(id) {
            return id;
        }
    }
}

/// Append `overlay`. An id already present in any kind is rejected.
pub fn add(overlays: &Overlays, overlay: Overlay) -> Overlays {
    let mut next = overlays.clone();
    if overlays.contains(overlay.id()) {
        log::warn!("overlay id {} already in use; add ignored", overlay.id());
        return next;
    }
    match overlay {
        Overlay::Text(o) => next.texts.push(o),
        Overlay::Icon(o) => next.icons.push(o),
        Overlay::Image(o) => next.images.push(o),
        Overlay::Shape(o) => next.shapes.push(o),
        Overlay::Path(o) => next.paths.push(o),
    }
    next
}

/// Move an overlay's anchor to `(x, y)`. A freehand path is translated as a
/// whole towards having its first point on `(x, y)`; the delta is limited so
/// every point stays in `[0,1]` and the path keeps its shape.
pub fn move_to(overlays: &Overlays, id: OverlayId, x: f64, y: f64) -> Overlays {
    let (x, y) = (clamp01(x), clamp01(y));
    let mut next = overlays.clone();
    if let Some(o) = next.texts.iter_mut().find(|o| o.id == id) {
        (o.x, o.y) = (x, y);
    } else if let Some(o) = next.icons.iter_mut().find(|o| o.id == id) {
        (o.x, o.y) = (x, y);
    } else if let Some(o) = next.images.iter_mut().find(|o| o.id == id) {
        (o.x, o.y) = (x, y);
    } else if let Some(o) = next.shapes.iter_mut().find(|o| o.id == id) {
        (o.x, o.y) = (x, y);
    } else if let Some(o) = next.paths.iter_mut().find(|o| o.id == id)
        && let Some(first) = o.points.first().copied()
    {
        let delta = limit_delta(&o.points, Point::new(x, y) - first);
        for p in &mut o.points {
            *p += delta;
        }
    }
    next
}

/// `delta` shrunk so that the bounding box of `points` stays inside `[0,1]`.
fn limit_delta(points: &[Point], delta: Vec2) -> Vec2 {
    let (mut lo, mut hi) = (Point::new(1.0, 1.0), Point::new(0.0, 0.0));
    for p in points {
        lo = Point::new(lo.x.min(p.x), lo.y.min(p.y));
        hi = Point::new(hi.x.max(p.x), hi.y.max(p.y));
    }
    Vec2::new(
        delta.x.max(-lo.x).min(1.0 - hi.x),
        delta.y.max(-lo.y).min(1.0 - hi.y),
    )
}

pub fn delete(overlays: &Overlays, id: OverlayId) -> Overlays {
    let mut next = overlays.clone();
    next.texts.retain(|o| o.id != id);
    next.icons.retain(|o| o.id != id);
    next.images.retain(|o| o.id != id);
    next.shapes.retain(|o| o.id != id);
    next.paths.retain(|o| o.id != id);
    next
}

pub fn patch_text(overlays: &Overlays, id: OverlayId, patch: TextPatch) -> Overlays {
    let mut next = overlays.clone();
    if let Some(o) = next.texts.iter_mut().find(|o| o.id == id) {
        if let Some(text) = patch.text {
            o.text = text;
        }
        if let Some(size) = patch.font_size {
            o.font_size = size;
        }
        if let Some(color) = patch.color {
            o.color = color;
        }
        if let Some(weight) = patch.font_weight {
            o.font_weight = weight;
        }
        if let Some(opacity) = patch.opacity {
            o.opacity = opacity.clamp(0.0, 100.0);
        }
        if let Some(width) = patch.width {
            o.width = width;
        }
    }
    next
}

pub fn patch_icon(overlays: &Overlays, id: OverlayId, patch: IconPatch) -> Overlays {
    let mut next = overlays.clone();
    if let Some(o) = next.icons.iter_mut().find(|o| o.id == id) {
        if let Some(icon) = patch.icon {
            o.icon = icon;
        }
        if let Some(size) = patch.size {
            o.size = size;
        }
    }
    next
}

pub fn patch_image(overlays: &Overlays, id: OverlayId, patch: ImagePatch) -> Overlays {
    let mut next = overlays.clone();
    if let Some(o) = next.images.iter_mut().find(|o| o.id == id) {
        if let Some(src) = patch.src {
            o.src = src;
        }
        if let Some(w) = patch.width {
            o.width = w;
        }
        if let Some(h) = patch.height {
            o.height = h;
        }
    }
    next
}

pub fn patch_shape(overlays: &Overlays, id: OverlayId, patch: ShapePatch) -> Overlays {
    let mut next = overlays.clone();
    if let Some(o) = next.shapes.iter_mut().find(|o| o.id == id) {
        if let Some(x) = patch.x {
            o.x = clamp01(x);
        }
        if let Some(y) = patch.y {
            o.y = clamp01(y);
        }
        match patch.geometry {
            Some(g) if g.kind() == o.geometry.kind() => o.geometry = g,
            Some(g) => log::debug!("ignoring {:?} geometry for {:?} shape {id}", g.kind(), o.geometry.kind()),
            None => {}
        }
        let style = &mut o.style;
        if let Some(c) = patch.stroke_color {
            style.stroke_color = c;
        }
        if let Some(c) = patch.fill_color {
            style.fill_color = c;
        }
        if let Some(w) = patch.stroke_width {
            style.stroke_width = w;
        }
        if let Some(f) = patch.filled {
            style.filled = f;
        }
        if let Some(op) = patch.opacity {
            style.opacity = op.clamp(0.0, 100.0);
        }
    }
    next
}

pub fn patch_path(overlays: &Overlays, id: OverlayId, patch: PathPatch) -> Overlays {
    let mut next = overlays.clone();
    if let Some(o) = next.paths.iter_mut().find(|o| o.id == id) {
        if let Some(c) = patch.stroke_color {
            o.stroke_color = c;
        }
        if let Some(w) = patch.stroke_width {
            o.stroke_width = w;
        }
        if let Some(op) = patch.opacity {
            o.opacity = op.clamp(0.0, 100.0);
        }
    }
    next
}

/// Append a point (clamped) to a freehand path being drawn.
pub fn extend_path(overlays: &Overlays, id: OverlayId, point: Point) -> Overlays {
    let mut next = overlays.clone();
    if let Some(o) = next.paths.iter_mut().find(|o| o.id == id) {
        o.points.push(Point::new(clamp01(point.x), clamp01(point.y)));
    }
    next
}

/// Select one text or shape overlay and deselect every other one.
/// `None`, or an id of another kind, clears the selection.
pub fn select(overlays: &Overlays, id: Option<OverlayId>) -> Overlays {
    let mut next = overlays.clone();
    for o in &mut next.texts {
        o.selected = Some(o.id) == id;
    }
    for o in &mut next.shapes {
        o.selected = Some(o.id) == id;
    }
    next
}
