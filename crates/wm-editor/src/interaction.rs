//! Pointer gesture state.
//!
//! At most one gesture is in progress. It starts on pointer-down, is fed by
//! pointer-move, and always returns to [`Interaction::Idle`] on pointer-up
//! or when the pointer leaves the canvas.

use kurbo::{Point, Vec2};
use wm_core::{OverlayId, ShapeKind};
use wm_render::Handle;

/// What a drag moves.
#[derive(Debug, Clone, PartialEq)]
pub enum DragTarget {
    Overlay(OverlayId),
    /// A notation component, by name; its position is written back into
    /// the source text.
    Component(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        target: DragTarget,
        /// Pointer position minus the target's anchor, in pixels.
        grab: Vec2,
    },
    Resizing {
        target: OverlayId,
        handle: Handle,
    },
    DrawingShape {
        id: OverlayId,
        kind: ShapeKind,
        /// Where the drag began, normalized.
        start: Point,
    },
    DrawingPath {
        id: OverlayId,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The overlay the gesture is acting on, if any.
    pub fn overlay(&self) -> Option<OverlayId> {
        match self {
            Self::Dragging {
                target: DragTarget::Overlay(id),
                ..
            }
            | Self::Resizing { target: id, .. }
            | Self::DrawingShape { id, .. }
            | Self::DrawingPath { id } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_drag_has_no_overlay() {
        let drag = Interaction::Dragging {
            target: DragTarget::Component("Tea".into()),
            grab: Vec2::ZERO,
        };
        assert_eq!(drag.overlay(), None);
        assert!(!drag.is_idle());
        assert!(Interaction::default().is_idle());
    }

    #[test]
    fn drawing_reports_its_overlay() {
        let id = OverlayId::intern("path_gesture");
        assert_eq!(Interaction::DrawingPath { id }.overlay(), Some(id));
    }
}
