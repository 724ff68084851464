//! Editor controller.
//!
//! Owns the document history, the active tool, the in-progress gesture and
//! the presentation sequencer, and turns host input into commits. All
//! coordinates arriving here are canvas pixels.

use crate::config::EditorConfig;
use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::interaction::{DragTarget, Interaction};
use crate::overlays::{self, ShapePatch, TextPatch};
use crate::presenter::PresenterChannel;
use crate::sequencer::{Sequencer, Timer, TimerId};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::Document;
use kurbo::Point;
use std::sync::Arc;
use wm_core::{
    DrawingPath, IconOverlay, ImageOverlay, Overlay, OverlayId, OverlayKind, Overlays, ShapeGeometry,
    ShapeKind, ShapeOverlay, TextOverlay, Viewport, WardleyMap, patch_component_position,
};
use wm_render::{
    ApproxMeasure, Hit, RevealPlan, TextMeasure, TextResize, hit_test, hit_test_sequence_target,
    render_svg, resize_handle_at, resize_shape, resize_text, reveal_plan,
};

/// Placeholder content for a freshly placed text overlay.
const NEW_TEXT: &str = "Text";

/// The active tool determines how pointer-down is interpreted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tool {
    /// Select, drag and resize.
    #[default]
    Move,
    Text,
    Icon {
        glyph: String,
    },
    Image {
        src: String,
        width: f64,
        height: f64,
    },
    Line,
    Rectangle,
    Circle,
    Triangle,
    Pen,
}

impl Tool {
    fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Tool::Line => Some(ShapeKind::Line),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Triangle => Some(ShapeKind::Triangle),
            _ => None,
        }
    }
}

pub struct Editor {
    history: History<Arc<Document>>,
    config: EditorConfig,
    tool: Tool,
    interaction: Interaction,
    measure: Box<dyn TextMeasure>,
    sequencer: Sequencer,
    presenting: bool,
}

impl Editor {
    pub fn new(source: &str, config: EditorConfig, timer: Box<dyn Timer>) -> Self {
        Self::from_document(Document::parse(source), config, timer)
    }

    /// Open an existing document, e.g. a loaded project.
    pub fn from_document(document: Document, config: EditorConfig, timer: Box<dyn Timer>) -> Self {
        let history = History::with_capacity(Arc::new(document), config.history_capacity);
        let mut sequencer = Sequencer::new(timer, config.autoplay_delay());
        sequencer.resync(&history);
        Self {
            history,
            config,
            tool: Tool::Move,
            interaction: Interaction::Idle,
            measure: Box::new(ApproxMeasure::default()),
            sequencer,
            presenting: false,
        }
    }

    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Connect a presenter surface and push the current state to it.
    pub fn connect_presenter(&mut self, channel: Box<dyn PresenterChannel>) {
        self.sequencer.attach(channel);
        self.sequencer.publish(&self.history);
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Arc<Document> {
        self.history.present()
    }

    pub fn source(&self) -> &str {
        &self.history.present().source
    }

    pub fn map(&self) -> &WardleyMap {
        &self.history.present().map
    }

    pub fn history(&self) -> &History<Arc<Document>> {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// Switching tools abandons any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.finish_gesture();
        self.tool = tool;
    }

    /// Resize the canvas. Diagram coordinates are unaffected.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }

    // ─── Source text ─────────────────────────────────────────────────────

    /// Replace the notation text. The map is re-parsed; overlays and the
    /// presentation sequence carry over. No undo step is recorded.
    pub fn set_source(&mut self, source: &str) {
        if source == self.source() {
            return;
        }
        let next = self.history.present().with_source(source);
        self.history.commit_silent(Arc::new(next));
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(Point::new(x, y)),
            InputEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => self.finish_gesture(),
            InputEvent::ContextMenu { x, y } => {
                self.delete_at(Point::new(x, y));
            }
            InputEvent::Key { key, modifiers } => {
                self.key(&key, modifiers);
            }
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if self.sequencer.is_recording() {
            self.record_click(point);
            return;
        }
        if self.presenting {
            return;
        }
        self.finish_gesture();

        let vp = self.config.viewport;
        let at = vp.to_normalized(point.x, point.y);
        match self.tool.clone() {
            Tool::Move => self.begin_move(point),
            Tool::Text => {
                let id = overlays::fresh_id(&self.map().overlays, OverlayKind::Text);
                let mut text = TextOverlay::new(id, NEW_TEXT, at.x, at.y);
                text.font_size = self.config.text_font_size;
                text.color = self.config.text_color.clone();
                let next = overlays::add(&self.map().overlays, Overlay::Text(text));
                self.commit_overlays(overlays::select(&next, Some(id)));
            }
            Tool::Icon { glyph } => {
                self.add_icon_at(point, &glyph);
            }
            Tool::Image { src, width, height } => {
                self.add_image_at(point, &src, width, height);
            }
            Tool::Pen => {
                let id = overlays::fresh_id(&self.map().overlays, OverlayKind::Path);
                let mut path = DrawingPath::new(id, at);
                path.stroke_color = self.config.pen_color.clone();
                path.stroke_width = self.config.pen_width;
                self.history.begin_batch();
                self.commit_overlays(overlays::add(&self.map().overlays, Overlay::Path(path)));
                self.interaction = Interaction::DrawingPath { id };
            }
            tool => {
                let Some(kind) = tool.shape_kind() else {
                    return;
                };
                let id = overlays::fresh_id(&self.map().overlays, OverlayKind::Shape);
                let mut shape = ShapeOverlay::new(id, at.x, at.y, ShapeGeometry::collapsed(kind, at.x, at.y));
                shape.style = self.config.shape_style.clone();
                self.history.begin_batch();
                self.commit_overlays(overlays::add(&self.map().overlays, Overlay::Shape(shape)));
                self.interaction = Interaction::DrawingShape { id, kind, start: at };
            }
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        let vp = self.config.viewport;
        match self.interaction.clone() {
            Interaction::Idle => {}
            Interaction::Dragging { target, grab } => self.drag_to(target, point - grab),
            Interaction::Resizing { target, handle } => {
                let doc = Arc::clone(self.history.present());
                let current = &doc.map.overlays;
                let next = if let Some(text) = current.text(target) {
                    let patch = match resize_text(text, handle, point, &vp) {
                        Some(TextResize::FontSize(size)) => TextPatch {
                            font_size: Some(size),
                            ..Default::default()
                        },
                        Some(TextResize::Width(width)) => TextPatch {
                            width: Some(Some(width)),
                            ..Default::default()
                        },
                        None => return,
                    };
                    overlays::patch_text(current, target, patch)
                } else if let Some(shape) = current.shape(target) {
                    let frame = resize_shape(shape, handle, point, &vp);
                    overlays::patch_shape(
                        current,
                        target,
                        ShapePatch {
                            x: Some(frame.x),
                            y: Some(frame.y),
                            geometry: Some(frame.geometry),
                            ..Default::default()
                        },
                    )
                } else {
                    return;
                };
                self.commit_overlays(next);
            }
            Interaction::DrawingShape { id, kind, start } => {
                let at = vp.to_normalized(point.x, point.y);
                let (x, y, geometry) = drawn_geometry(kind, start, at, &vp);
                let next = overlays::patch_shape(
                    &self.map().overlays,
                    id,
                    ShapePatch {
                        x: Some(x),
                        y: Some(y),
                        geometry: Some(geometry),
                        ..Default::default()
                    },
                );
                self.commit_overlays(next);
            }
            Interaction::DrawingPath { id } => {
                let at = vp.to_normalized(point.x, point.y);
                let next = overlays::extend_path(&self.map().overlays, id, at);
                self.commit_overlays(next);
            }
        }
    }

    /// End the gesture in progress (pointer-up or pointer-leave).
    pub fn finish_gesture(&mut self) {
        let interaction = std::mem::take(&mut self.interaction);
        if let Interaction::DrawingShape { id, .. } = interaction {
            self.apply_default_size(id);
        }
        if !interaction.is_idle() {
            self.history.end_batch();
        }
    }

    /// Context-menu deletion. Components live in the source text and are
    /// never deleted from the canvas; returns whether an overlay was removed.
    pub fn delete_at(&mut self, point: Point) -> bool {
        if self.presenting || self.sequencer.is_recording() {
            return false;
        }
        let vp = self.config.viewport;
        let hit = hit_test(self.map(), &vp, self.measure.as_ref(), point);
        let Some(id) = hit.as_ref().and_then(Hit::overlay_id) else {
            if let Some(Hit::Component(name)) = hit {
                log::debug!("component {name} can only be removed in the source text");
            }
            return false;
        };
        self.commit_overlays(overlays::delete(&self.map().overlays, id));
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.map().overlays.selected() else {
            return false;
        };
        self.commit_overlays(overlays::delete(&self.map().overlays, id));
        true
    }

    pub fn deselect(&mut self) {
        self.set_selection(None);
    }

    /// Apply a keyboard shortcut. Returns the action that was run.
    pub fn key(&mut self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, modifiers, self.presenting)?;
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::Deselect => self.deselect(),
            ShortcutAction::ToolMove => self.set_tool(Tool::Move),
            ShortcutAction::ToolText => self.set_tool(Tool::Text),
            ShortcutAction::ToolLine => self.set_tool(Tool::Line),
            ShortcutAction::ToolRectangle => self.set_tool(Tool::Rectangle),
            ShortcutAction::ToolCircle => self.set_tool(Tool::Circle),
            ShortcutAction::ToolTriangle => self.set_tool(Tool::Triangle),
            ShortcutAction::ToolPen => self.set_tool(Tool::Pen),
            ShortcutAction::NextStep => {
                self.next_step();
            }
            ShortcutAction::PreviousStep => {
                self.previous_step();
            }
            ShortcutAction::TogglePlay => {
                if self.sequencer.is_playing() {
                    self.pause();
                } else {
                    self.play();
                }
            }
            ShortcutAction::ExitPresentation => self.exit_presentation(),
        }
        Some(action)
    }

    // ─── Overlays ────────────────────────────────────────────────────────

    pub fn add_icon_at(&mut self, point: Point, glyph: &str) -> OverlayId {
        let at = self.config.viewport.to_normalized(point.x, point.y);
        let id = overlays::fresh_id(&self.map().overlays, OverlayKind::Icon);
        let mut icon = IconOverlay::new(id, glyph, at.x, at.y);
        icon.size = self.config.icon_size;
        self.commit_overlays(overlays::add(&self.map().overlays, Overlay::Icon(icon)));
        id
    }

    /// Place an image with its top-left corner at `point`; `width` and
    /// `height` are pixels.
    pub fn add_image_at(&mut self, point: Point, src: &str, width: f64, height: f64) -> OverlayId {
        let at = self.config.viewport.to_normalized(point.x, point.y);
        let id = overlays::fresh_id(&self.map().overlays, OverlayKind::Image);
        let image = ImageOverlay {
            id,
            src: src.to_string(),
            x: at.x,
            y: at.y,
            width,
            height,
        };
        self.commit_overlays(overlays::add(&self.map().overlays, Overlay::Image(image)));
        id
    }

    /// Run an overlay-store operation and commit its result as one undo
    /// step, e.g. `editor.edit_overlays(|o| overlays::patch_text(o, id, patch))`.
    pub fn edit_overlays(&mut self, edit: impl FnOnce(&Overlays) -> Overlays) {
        let next = edit(&self.map().overlays);
        if next != self.map().overlays {
            self.commit_overlays(next);
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        let changed = self.history.undo();
        if changed {
            self.sequencer.resync(&self.history);
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        let changed = self.history.redo();
        if changed {
            self.sequencer.resync(&self.history);
        }
        changed
    }

    // ─── Presentation ────────────────────────────────────────────────────

    pub fn start_recording(&mut self) -> bool {
        self.finish_gesture();
        self.sequencer.start_recording(&mut self.history)
    }

    pub fn stop_recording(&mut self) -> bool {
        self.sequencer.stop_recording(&mut self.history)
    }

    pub fn clear_sequence(&mut self) {
        self.sequencer.clear(&mut self.history);
    }

    pub fn enter_presentation(&mut self) {
        self.finish_gesture();
        self.presenting = true;
    }

    pub fn exit_presentation(&mut self) {
        self.sequencer.stop_presentation(&self.history);
        self.presenting = false;
    }

    pub fn play(&mut self) -> bool {
        self.sequencer.play(&self.history)
    }

    pub fn pause(&mut self) -> bool {
        self.sequencer.pause(&self.history)
    }

    pub fn next_step(&mut self) -> bool {
        self.sequencer.next(&self.history)
    }

    pub fn previous_step(&mut self) -> bool {
        self.sequencer.previous(&self.history)
    }

    /// Deliver a fired autoplay tick.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        self.sequencer.on_timer(&self.history, id)
    }

    /// Handle messages from a connected presenter surface.
    pub fn pump_presenter(&mut self) {
        self.sequencer.pump(&self.history);
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// What to draw right now: the partial reveal while presenting,
    /// everything otherwise.
    pub fn reveal_plan(&self) -> RevealPlan {
        if self.presenting {
            reveal_plan(self.map(), self.sequencer.step())
        } else {
            RevealPlan::Full
        }
    }

    pub fn render_svg(&self) -> String {
        render_svg(self.map(), &self.config.viewport, &self.reveal_plan())
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn record_click(&mut self, point: Point) {
        let vp = self.config.viewport;
        if let Some((kind, id)) = hit_test_sequence_target(self.map(), &vp, point) {
            self.sequencer.item_clicked(&mut self.history, kind, &id);
        }
    }

    fn begin_move(&mut self, point: Point) {
        let vp = self.config.viewport;
        let doc = Arc::clone(self.history.present());

        if let Some((target, handle)) = resize_handle_at(&doc.map, &vp, self.measure.as_ref(), point) {
            self.history.begin_batch();
            self.interaction = Interaction::Resizing { target, handle };
            return;
        }

        let hit = hit_test(&doc.map, &vp, self.measure.as_ref(), point);
        let selectable = match hit {
            Some(Hit::Text(id) | Hit::Shape(id)) => Some(id),
            _ => None,
        };
        self.set_selection(selectable);

        let target = match hit {
            None => return,
            Some(Hit::Component(name)) => DragTarget::Component(name),
            Some(other) => match other.overlay_id() {
                Some(id) => DragTarget::Overlay(id),
                None => return,
            },
        };
        let Some(anchor) = anchor_of(&doc.map, &target, &vp) else {
            return;
        };
        self.history.begin_batch();
        self.interaction = Interaction::Dragging {
            target,
            grab: point - anchor,
        };
    }

    fn drag_to(&mut self, target: DragTarget, anchor: Point) {
        let at = self.config.viewport.to_normalized(anchor.x, anchor.y);
        match target {
            DragTarget::Overlay(id) => {
                let next = overlays::move_to(&self.map().overlays, id, at.x, at.y);
                self.commit_overlays(next);
            }
            DragTarget::Component(name) => {
                let current = self.history.present();
                let mut map = current.map.clone();
                let Some(component) = map.components.iter_mut().find(|c| c.name == name) else {
                    return;
                };
                component.x = at.x;
                component.y = at.y;
                let source = patch_component_position(&current.source, &name, at.x, at.y);
                self.history.commit(Arc::new(Document { source, map }));
            }
        }
    }

    /// A rectangle, triangle or circle released without being dragged out
    /// gets the configured default size.
    fn apply_default_size(&mut self, id: OverlayId) {
        let vp = self.config.viewport;
        let Some(shape) = self.map().overlays.shape(id) else {
            return;
        };
        let (bw, bh) = self.config.default_box;
        let geometry = match shape.geometry {
            ShapeGeometry::Rectangle { width, height } if width == 0.0 && height == 0.0 => {
                ShapeGeometry::Rectangle {
                    width: bw / vp.scale_x(),
                    height: bh / vp.scale_y(),
                }
            }
            ShapeGeometry::Triangle { width, height } if width == 0.0 && height == 0.0 => {
                ShapeGeometry::Triangle {
                    width: bw / vp.scale_x(),
                    height: bh / vp.scale_y(),
                }
            }
            ShapeGeometry::Circle { radius } if radius == 0.0 => ShapeGeometry::Circle {
                radius: self.config.default_radius / vp.scale_min(),
            },
            _ => return,
        };
        let next = overlays::patch_shape(
            &self.map().overlays,
            id,
            ShapePatch {
                geometry: Some(geometry),
                ..Default::default()
            },
        );
        self.commit_overlays(next);
    }

    /// Selection is view state: it changes the present without an undo step.
    fn set_selection(&mut self, id: Option<OverlayId>) {
        if self.map().overlays.selected() == id {
            return;
        }
        let current = self.history.present();
        let mut map = current.map.clone();
        map.overlays = overlays::select(&map.overlays, id);
        let next = Document {
            source: current.source.clone(),
            map,
        };
        self.history.commit_silent(Arc::new(next));
    }

    fn commit_overlays(&mut self, overlays: Overlays) {
        let current = self.history.present();
        let next = Document {
            source: current.source.clone(),
            map: WardleyMap {
                overlays,
                ..current.map.clone()
            },
        };
        self.history.commit(Arc::new(next));
    }
}

/// Pixel position a drag keeps under the pointer.
fn anchor_of(map: &WardleyMap, target: &DragTarget, vp: &Viewport) -> Option<Point> {
    let diagram = match target {
        DragTarget::Component(name) => map.component(name)?.position(),
        DragTarget::Overlay(id) => {
            let o = &map.overlays;
            if let Some(t) = o.texts.iter().find(|t| t.id == *id) {
                Point::new(t.x, t.y)
            } else if let Some(i) = o.icons.iter().find(|i| i.id == *id) {
                Point::new(i.x, i.y)
            } else if let Some(i) = o.images.iter().find(|i| i.id == *id) {
                Point::new(i.x, i.y)
            } else if let Some(s) = o.shapes.iter().find(|s| s.id == *id) {
                Point::new(s.x, s.y)
            } else {
                *o.paths.iter().find(|p| p.id == *id)?.points.first()?
            }
        }
    };
    Some(vp.point_to_pixel(diagram))
}

/// Anchor and geometry of a shape dragged out from `start` to `at`, both
/// normalized. Boxes anchor at their top-left corner whichever way the
/// drag went.
fn drawn_geometry(kind: ShapeKind, start: Point, at: Point, vp: &Viewport) -> (f64, f64, ShapeGeometry) {
    let width = (at.x - start.x).abs();
    let height = (at.y - start.y).abs();
    let (left, top) = (start.x.min(at.x), start.y.max(at.y));
    match kind {
        ShapeKind::Line => (
            start.x,
            start.y,
            ShapeGeometry::Line {
                end_x: at.x,
                end_y: at.y,
            },
        ),
        ShapeKind::Rectangle => (left, top, ShapeGeometry::Rectangle { width, height }),
        ShapeKind::Triangle => (left, top, ShapeGeometry::Triangle { width, height }),
        ShapeKind::Circle => {
            let radius = vp.point_to_pixel(start).distance(vp.point_to_pixel(at)) / vp.scale_min();
            (start.x, start.y, ShapeGeometry::Circle { radius })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::ManualTimer;
    use pretty_assertions::assert_eq;

    fn editor(source: &str) -> Editor {
        let config = EditorConfig {
            viewport: Viewport::new(1100.0, 1100.0),
            ..Default::default()
        };
        Editor::new(source, config, Box::new(ManualTimer::new()))
    }

    fn px(editor: &Editor, x: f64, y: f64) -> Point {
        editor.viewport().to_pixel(x, y)
    }

    #[test]
    fn rectangle_drag_is_one_undo_step() {
        let mut e = editor("");
        e.set_tool(Tool::Rectangle);
        e.pointer_down(px(&e, 0.2, 0.8));
        e.pointer_move(px(&e, 0.3, 0.7));
        e.pointer_move(px(&e, 0.4, 0.6));
        e.finish_gesture();

        let shape = &e.map().overlays.shapes[0];
        assert!((shape.x - 0.2).abs() < 1e-9);
        assert!((shape.y - 0.8).abs() < 1e-9);
        match shape.geometry {
            ShapeGeometry::Rectangle { width, height } => {
                assert!((width - 0.2).abs() < 1e-9);
                assert!((height - 0.2).abs() < 1e-9);
            }
            other => panic!("expected rectangle, got {other:?}"),
        }
        assert_eq!(e.history().past_len(), 1);
        assert!(e.undo());
        assert!(e.map().overlays.shapes.is_empty());
    }

    #[test]
    fn backwards_drag_anchors_top_left() {
        let mut e = editor("");
        e.set_tool(Tool::Triangle);
        e.pointer_down(px(&e, 0.5, 0.3));
        e.pointer_move(px(&e, 0.4, 0.5));
        e.finish_gesture();
        let shape = &e.map().overlays.shapes[0];
        assert!((shape.x - 0.4).abs() < 1e-9);
        assert!((shape.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn click_without_drag_gets_default_size() {
        let mut e = editor("");
        e.set_tool(Tool::Circle);
        e.pointer_down(px(&e, 0.5, 0.5));
        e.finish_gesture();
        match e.map().overlays.shapes[0].geometry {
            ShapeGeometry::Circle { radius } => assert!((radius - 0.05).abs() < 1e-9),
            other => panic!("expected circle, got {other:?}"),
        }
        assert_eq!(e.history().past_len(), 1);
        assert!(e.interaction().is_idle());
    }

    #[test]
    fn pen_collects_points() {
        let mut e = editor("");
        e.set_tool(Tool::Pen);
        e.pointer_down(px(&e, 0.1, 0.1));
        e.pointer_move(px(&e, 0.2, 0.2));
        e.pointer_move(px(&e, 0.3, 0.1));
        e.handle(InputEvent::PointerLeave);
        assert_eq!(e.map().overlays.paths[0].points.len(), 3);
        assert_eq!(e.history().past_len(), 1);
    }

    #[test]
    fn dragging_a_component_rewrites_the_source() {
        let mut e = editor("title Tea\ncomponent Tea [0.50, 0.50]");
        e.pointer_down(px(&e, 0.5, 0.5));
        e.pointer_move(px(&e, 0.75, 0.25));
        e.finish_gesture();
        assert_eq!(e.source(), "title Tea\ncomponent Tea [0.25, 0.75]");
        let tea = e.map().component("Tea").expect("still declared");
        assert!((tea.x - 0.75).abs() < 1e-9);
        e.undo();
        assert_eq!(e.source(), "title Tea\ncomponent Tea [0.50, 0.50]");
    }

    #[test]
    fn clicking_text_selects_it_silently() {
        let mut e = editor("");
        e.set_tool(Tool::Text);
        e.pointer_down(px(&e, 0.5, 0.5));
        let id = e.map().overlays.texts[0].id;
        assert_eq!(e.map().overlays.selected(), Some(id));
        e.set_tool(Tool::Move);
        e.pointer_down(px(&e, 0.9, 0.1));
        e.finish_gesture();
        assert_eq!(e.map().overlays.selected(), None);
        assert_eq!(e.history().past_len(), 1);
    }

    #[test]
    fn context_delete_refuses_components() {
        let mut e = editor("component A [0.5, 0.5]");
        let p = px(&e, 0.5, 0.5);
        assert!(!e.delete_at(p));
        e.add_icon_at(px(&e, 0.2, 0.2), "★");
        assert!(e.delete_at(px(&e, 0.2, 0.2)));
        assert!(e.map().overlays.icons.is_empty());
    }

    #[test]
    fn typing_keeps_overlays_without_undo_step() {
        let mut e = editor("component A [0.5, 0.5]");
        e.add_icon_at(px(&e, 0.2, 0.2), "★");
        e.set_source("component A [0.5, 0.5]\ncomponent B [0.1, 0.1]");
        assert_eq!(e.map().components.len(), 2);
        assert_eq!(e.map().overlays.icons.len(), 1);
        assert_eq!(e.history().past_len(), 1);
    }

    #[test]
    fn recording_clicks_toggle_sequence_items() {
        let mut e = editor("component A [0.5, 0.5]\ncomponent B [0.2, 0.2]\nA -> B");
        e.start_recording();
        e.pointer_down(px(&e, 0.5, 0.5));
        e.pointer_down(px(&e, 0.35, 0.35));
        e.stop_recording();
        let ids: Vec<_> = e
            .map()
            .sequence
            .items
            .iter()
            .map(|i| i.target_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "A->B"]);
        assert!(e.map().overlays.is_empty());
    }

    #[test]
    fn presentation_keys_step_the_reveal() {
        let mut e = editor("component A [0.5, 0.5]");
        e.start_recording();
        e.pointer_down(px(&e, 0.5, 0.5));
        e.stop_recording();
        e.enter_presentation();
        assert_eq!(e.key(" ", Modifiers::default()), Some(ShortcutAction::NextStep));
        assert_eq!(e.reveal_plan().component("A"), Some(0.7));
        e.key("Escape", Modifiers::default());
        assert!(!e.is_presenting());
        assert!(e.reveal_plan().is_full());
    }
}
