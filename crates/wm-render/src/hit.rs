//! Hit testing: canvas point → map entity.
//!
//! Kinds are tried in a fixed order (shapes, freehand paths, text, icons,
//! images, components) and, within a kind, from the most recently added
//! entity backwards. The first match wins, so overlays always shadow the
//! map components beneath them.

use crate::measure::TextMeasure;
use crate::project::{PixelShape, project_shape, rect_contains, text_box};
use kurbo::{Point, Rect};
use wm_core::geometry::{distance_to_segment, point_in_triangle};
use wm_core::{OverlayId, SequenceKind, Viewport, WardleyMap};

/// Pointer distance (px) within which a line or path segment is hit.
pub const STROKE_TOLERANCE: f64 = 5.0;
/// Pointer distance (px) within which a component marker is hit.
pub const COMPONENT_RADIUS: f64 = 12.0;
/// Component pick radius (px) while recording a presentation.
pub const SEQUENCE_COMPONENT_RADIUS: f64 = 20.0;
/// Connection pick distance (px) while recording a presentation.
pub const SEQUENCE_CONNECTION_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Shape(OverlayId),
    Path(OverlayId),
    Text(OverlayId),
    Icon(OverlayId),
    Image(OverlayId),
    Component(String),
}

impl Hit {
    pub fn overlay_id(&self) -> Option<OverlayId> {
        match self {
            Hit::Shape(id) | Hit::Path(id) | Hit::Text(id) | Hit::Icon(id) | Hit::Image(id) => {
                Some(*id)
            }
            Hit::Component(_) => None,
        }
    }
}

/// Topmost entity at `point` (canvas pixels), or `None` for background.
pub fn hit_test(
    map: &WardleyMap,
    vp: &Viewport,
    measure: &dyn TextMeasure,
    point: Point,
) -> Option<Hit> {
    let overlays = &map.overlays;

    if let Some(shape) = overlays
        .shapes
        .iter()
        .rev()
        .find(|s| shape_contains(project_shape(s, vp), point))
    {
        return Some(Hit::Shape(shape.id));
    }

    if let Some(path) = overlays.paths.iter().rev().find(|p| {
        p.points.windows(2).any(|seg| {
            let a = vp.point_to_pixel(seg[0]);
            let b = vp.point_to_pixel(seg[1]);
            distance_to_segment(point, a, b) < STROKE_TOLERANCE
        })
    }) {
        return Some(Hit::Path(path.id));
    }

    if let Some(text) = overlays
        .texts
        .iter()
        .rev()
        .find(|t| rect_contains(text_box(t, vp, measure), point))
    {
        return Some(Hit::Text(text.id));
    }

    if let Some(icon) = overlays.icons.iter().rev().find(|i| {
        let c = vp.to_pixel(i.x, i.y);
        (point.x - c.x).abs() < i.size && (point.y - c.y).abs() < i.size
    }) {
        return Some(Hit::Icon(icon.id));
    }

    if let Some(image) = overlays.images.iter().rev().find(|i| {
        let origin = vp.to_pixel(i.x, i.y);
        let rect = Rect::new(origin.x, origin.y, origin.x + i.width, origin.y + i.height).abs();
        rect_contains(rect, point)
    }) {
        return Some(Hit::Image(image.id));
    }

    map.components
        .iter()
        .rev()
        .find(|c| vp.to_pixel(c.x, c.y).distance(point) <= COMPONENT_RADIUS)
        .map(|c| Hit::Component(c.name.clone()))
}

fn shape_contains(shape: PixelShape, p: Point) -> bool {
    match shape {
        PixelShape::Segment { start, end } => distance_to_segment(p, start, end) < STROKE_TOLERANCE,
        PixelShape::Box(rect) => rect_contains(rect, p),
        PixelShape::Disc { center, radius } => center.distance(p) <= radius,
        PixelShape::Triangle { apex, left, right } => point_in_triangle(p, apex, left, right),
    }
}

/// Component or connection to toggle in a presentation sequence when the
/// user clicks `point` during recording. Components take precedence;
/// connections with an unresolved endpoint are never picked.
pub fn hit_test_sequence_target(
    map: &WardleyMap,
    vp: &Viewport,
    point: Point,
) -> Option<(SequenceKind, String)> {
    if let Some(c) = map
        .components
        .iter()
        .rev()
        .find(|c| vp.to_pixel(c.x, c.y).distance(point) < SEQUENCE_COMPONENT_RADIUS)
    {
        return Some((SequenceKind::Component, c.name.clone()));
    }

    map.connections
        .iter()
        .rev()
        .find(|conn| {
            map.resolve_connection(conn).is_some_and(|(from, to)| {
                let a = vp.to_pixel(from.x, from.y);
                let b = vp.to_pixel(to.x, to.y);
                distance_to_segment(point, a, b) < SEQUENCE_CONNECTION_TOLERANCE
            })
        })
        .map(|conn| (SequenceKind::Connection, conn.id()))
}
