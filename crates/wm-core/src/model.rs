//! Data model for value-chain maps.
//!
//! A [`WardleyMap`] holds the entities declared by the notation
//! (components, connections, notes, evolution stages, style) together with
//! everything the user layers on top interactively: overlays and the
//! presentation sequence. Re-parsing the notation replaces the former and
//! keeps the latter.
//!
//! All positions live in diagram space: `x` is evolution (0 = genesis,
//! 1 = commodity) and `y` is value-chain visibility (1 = visible, top of
//! the canvas).

use crate::id::OverlayId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Stages shown on the evolution axis when the notation declares none.
pub const DEFAULT_EVOLUTION: [&str; 4] = ["Genesis", "Custom Built", "Product", "Commodity"];

pub const DEFAULT_STYLE: &str = "wardley";

// ─── Map ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardleyMap {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub evolution: Vec<String>,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub overlays: Overlays,
    #[serde(default)]
    pub sequence: AnimationSequence,
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

impl Default for WardleyMap {
    fn default() -> Self {
        Self {
            title: String::new(),
            components: Vec::new(),
            connections: Vec::new(),
            notes: Vec::new(),
            evolution: Vec::new(),
            style: default_style(),
            overlays: Overlays::default(),
            sequence: AnimationSequence::default(),
        }
    }
}

impl WardleyMap {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Both endpoints of a connection, or `None` when either name is not
    /// declared in this map.
    pub fn resolve_connection(&self, conn: &Connection) -> Option<(&Component, &Component)> {
        Some((self.component(&conn.from)?, self.component(&conn.to)?))
    }

    /// Stage labels for the evolution axis, falling back to the four
    /// classic stages.
    pub fn evolution_stages(&self) -> Vec<&str> {
        if self.evolution.is_empty() {
            DEFAULT_EVOLUTION.to_vec()
        } else {
            self.evolution.iter().map(String::as_str).collect()
        }
    }

    /// Replace the notation-derived parts with those of `parsed`, keeping
    /// this map's overlays and presentation sequence.
    pub fn with_notation_from(&self, parsed: WardleyMap) -> WardleyMap {
        WardleyMap {
            overlays: self.overlays.clone(),
            sequence: self.sequence.clone(),
            ..parsed
        }
    }
}

// ─── Notation entities ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Build,
    Buy,
    Outsource,
}

impl Category {
    pub fn keyword(self) -> &'static str {
        match self {
            Category::Build => "build",
            Category::Buy => "buy",
            Category::Outsource => "outsource",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Category::Build => "#4A90E2",
            Category::Buy => "#7ED321",
            Category::Outsource => "#F5A623",
        }
    }
}

/// Offset of a component's label from its default position, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOffset {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub inertia: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Component {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            label: None,
            category: None,
            inertia: false,
            color: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Fill color: explicit `color(...)` first, then the category color.
    pub fn display_color(&self) -> &str {
        match (&self.color, self.category) {
            (Some(color), _) => color,
            (None, Some(cat)) => cat.color(),
            (None, None) => "#000000",
        }
    }
}

/// Directed dependency between two components, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Identifier used by presentation sequences: `from->to`.
    pub fn id(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

// ─── Overlays ────────────────────────────────────────────────────────────

/// Every user-added annotation, grouped by kind. Within each list the last
/// element is the most recently added one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlays {
    #[serde(default)]
    pub texts: Vec<TextOverlay>,
    #[serde(default)]
    pub icons: Vec<IconOverlay>,
    #[serde(default)]
    pub images: Vec<ImageOverlay>,
    #[serde(default)]
    pub shapes: Vec<ShapeOverlay>,
    #[serde(default)]
    pub paths: Vec<DrawingPath>,
}

impl Overlays {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
            && self.icons.is_empty()
            && self.images.is_empty()
            && self.shapes.is_empty()
            && self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.texts.len() + self.icons.len() + self.images.len() + self.shapes.len() + self.paths.len()
    }

    /// Kind of the overlay carrying `id`, if any.
    pub fn kind_of(&self, id: OverlayId) -> Option<OverlayKind> {
        if self.texts.iter().any(|o| o.id == id) {
            Some(OverlayKind::Text)
        } else if self.icons.iter().any(|o| o.id == id) {
            Some(OverlayKind::Icon)
        } else if self.images.iter().any(|o| o.id == id) {
            Some(OverlayKind::Image)
        } else if self.shapes.iter().any(|o| o.id == id) {
            Some(OverlayKind::Shape)
        } else if self.paths.iter().any(|o| o.id == id) {
            Some(OverlayKind::Path)
        } else {
            None
        }
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.kind_of(id).is_some()
    }

    pub fn text(&self, id: OverlayId) -> Option<&TextOverlay> {
        self.texts.iter().find(|o| o.id == id)
    }

    pub fn shape(&self, id: OverlayId) -> Option<&ShapeOverlay> {
        self.shapes.iter().find(|o| o.id == id)
    }

    pub fn path(&self, id: OverlayId) -> Option<&DrawingPath> {
        self.paths.iter().find(|o| o.id == id)
    }

    /// The currently selected text or shape overlay.
    pub fn selected(&self) -> Option<OverlayId> {
        self.texts
            .iter()
            .find(|t| t.selected)
            .map(|t| t.id)
            .or_else(|| self.shapes.iter().find(|s| s.selected).map(|s| s.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Text,
    Icon,
    Image,
    Shape,
    Path,
}

impl OverlayKind {
    /// Prefix for generated ids of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            OverlayKind::Text => "text",
            OverlayKind::Icon => "icon",
            OverlayKind::Image => "image",
            OverlayKind::Shape => "shape",
            OverlayKind::Path => "path",
        }
    }
}

/// An overlay of any kind, used where the store accepts one uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Text(TextOverlay),
    Icon(IconOverlay),
    Image(ImageOverlay),
    Shape(ShapeOverlay),
    Path(DrawingPath),
}

impl Overlay {
    pub fn id(&self) -> OverlayId {
        match self {
            Overlay::Text(o) => o.id,
            Overlay::Icon(o) => o.id,
            Overlay::Image(o) => o.id,
            Overlay::Shape(o) => o.id,
            Overlay::Path(o) => o.id,
        }
    }

    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Text(_) => OverlayKind::Text,
            Overlay::Icon(_) => OverlayKind::Icon,
            Overlay::Image(_) => OverlayKind::Image,
            Overlay::Shape(_) => OverlayKind::Shape,
            Overlay::Path(_) => OverlayKind::Path,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub id: OverlayId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub color: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Percent, 0–100.
    pub opacity: f64,
    /// Explicit box width in pixels; measured from the text when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub selected: bool,
}

impl TextOverlay {
    pub fn new(id: OverlayId, text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            text: text.into(),
            x,
            y,
            font_size: 16.0,
            color: "#000000".to_string(),
            font_weight: FontWeight::Normal,
            opacity: 100.0,
            width: None,
            selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconOverlay {
    pub id: OverlayId,
    pub icon: String,
    pub x: f64,
    pub y: f64,
    /// Half-extent of the square hit area, in pixels.
    pub size: f64,
}

impl IconOverlay {
    pub fn new(id: OverlayId, icon: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            icon: icon.into(),
            x,
            y,
            size: 24.0,
        }
    }
}

/// Raster image anchored at its top-left corner. Width and height are in
/// pixels, not diagram units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOverlay {
    pub id: OverlayId,
    pub src: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
    Triangle,
}

/// Type-specific extent of a shape, in diagram units. Width and height grow
/// toward the bottom-right of the canvas from the shape's anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeGeometry {
    Line {
        #[serde(rename = "endX")]
        end_x: f64,
        #[serde(rename = "endY")]
        end_y: f64,
    },
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    Triangle { width: f64, height: f64 },
}

impl ShapeGeometry {
    /// Zero-extent geometry anchored at `(x, y)`, the state a shape starts
    /// in when the user begins drawing it.
    pub fn collapsed(kind: ShapeKind, x: f64, y: f64) -> Self {
        match kind {
            ShapeKind::Line => ShapeGeometry::Line { end_x: x, end_y: y },
            ShapeKind::Rectangle => ShapeGeometry::Rectangle {
                width: 0.0,
                height: 0.0,
            },
            ShapeKind::Circle => ShapeGeometry::Circle { radius: 0.0 },
            ShapeKind::Triangle => ShapeGeometry::Triangle {
                width: 0.0,
                height: 0.0,
            },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Line { .. } => ShapeKind::Line,
            ShapeGeometry::Rectangle { .. } => ShapeKind::Rectangle,
            ShapeGeometry::Circle { .. } => ShapeKind::Circle,
            ShapeGeometry::Triangle { .. } => ShapeKind::Triangle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub stroke_color: String,
    pub fill_color: String,
    pub stroke_width: f64,
    pub filled: bool,
    /// Percent, 0–100.
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            fill_color: "#FFFFFF".to_string(),
            stroke_width: 2.0,
            filled: false,
            opacity: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeOverlay {
    pub id: OverlayId,
    pub x: f64,
    pub y: f64,
    pub geometry: ShapeGeometry,
    #[serde(default)]
    pub style: ShapeStyle,
    #[serde(default)]
    pub selected: bool,
}

impl ShapeOverlay {
    pub fn new(id: OverlayId, x: f64, y: f64, geometry: ShapeGeometry) -> Self {
        Self {
            id,
            x,
            y,
            geometry,
            style: ShapeStyle::default(),
            selected: false,
        }
    }
}

/// Freehand stroke; points are in diagram space, in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingPath {
    pub id: OverlayId,
    pub points: Vec<Point>,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl DrawingPath {
    pub fn new(id: OverlayId, start: Point) -> Self {
        Self {
            id,
            points: vec![start],
            stroke_color: "#000000".to_string(),
            stroke_width: 2.0,
            opacity: 100.0,
        }
    }
}

// ─── Presentation sequence ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceKind {
    Component,
    Connection,
    Text,
    Icon,
    Image,
    Shape,
    Drawing,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceItem {
    pub kind: SequenceKind,
    pub target_id: String,
    /// 1-based position in the reveal order.
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSequence {
    #[serde(default)]
    pub items: Vec<SequenceItem>,
    #[serde(default)]
    pub is_recording: bool,
}

impl AnimationSequence {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, kind: SequenceKind, target_id: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.kind == kind && item.target_id == target_id)
    }

    /// Add the target at the end, or remove it if already present.
    /// Orders stay contiguous `1..=N` in both cases.
    pub fn toggle(&mut self, kind: SequenceKind, target_id: &str) {
        let before = self.items.len();
        self.items
            .retain(|item| !(item.kind == kind && item.target_id == target_id));
        if self.items.len() == before {
            self.items.push(SequenceItem {
                kind,
                target_id: target_id.to_string(),
                order: 0,
            });
        }
        self.renumber();
    }

    fn renumber(&mut self) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.order = i as u32 + 1;
        }
    }
}
