//! What a presentation step shows.
//!
//! At step `n > 0` the first `n` sequence items are on screen; the newest
//! of them (item `n`) is drawn at [`LATEST_OPACITY`] to draw the eye. Map
//! components and connections outside that prefix are hidden. Overlays are
//! hidden only when the sequence lists them and they have not been reached
//! yet, so free text stays on screen throughout. Notes appear once a
//! revealed component sits within [`NOTE_PROXIMITY`] of them.
//!
//! Step 0 is the plain, fully drawn map.

use std::collections::{HashMap, HashSet};
use wm_core::{Connection, Note, OverlayKind, SequenceKind, WardleyMap};

pub const LATEST_OPACITY: f64 = 0.7;
/// Diagram-space distance, per axis, at which a note follows a component.
pub const NOTE_PROXIMITY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum RevealPlan {
    /// Everything at full opacity.
    Full,
    Partial {
        /// Opacity of each revealed item, keyed by kind and target id.
        revealed: HashMap<(SequenceKind, String), f64>,
        /// Every item the sequence lists, revealed or not.
        sequenced: HashSet<(SequenceKind, String)>,
        /// Positions of revealed components, for note proximity.
        anchors: Vec<(f64, f64)>,
    },
}

pub fn reveal_plan(map: &WardleyMap, step: usize) -> RevealPlan {
    if step == 0 || map.sequence.is_empty() {
        return RevealPlan::Full;
    }
    let step = step.min(map.sequence.len());
    let mut items: Vec<_> = map.sequence.items.iter().collect();
    items.sort_by_key(|item| item.order);

    let mut revealed = HashMap::new();
    let mut sequenced = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        let key = (item.kind, item.target_id.clone());
        sequenced.insert(key.clone());
        if i < step {
            let opacity = if i + 1 == step { LATEST_OPACITY } else { 1.0 };
            revealed.insert(key, opacity);
        }
    }

    let anchors = map
        .components
        .iter()
        .filter(|c| revealed.contains_key(&(SequenceKind::Component, c.name.clone())))
        .map(|c| (c.x, c.y))
        .collect();

    RevealPlan::Partial {
        revealed,
        sequenced,
        anchors,
    }
}

impl RevealPlan {
    pub fn is_full(&self) -> bool {
        matches!(self, RevealPlan::Full)
    }

    fn revealed(&self, kind: SequenceKind, id: &str) -> Option<f64> {
        match self {
            RevealPlan::Full => Some(1.0),
            RevealPlan::Partial { revealed, .. } => revealed.get(&(kind, id.to_string())).copied(),
        }
    }

    /// Opacity for a component, `None` when hidden.
    pub fn component(&self, name: &str) -> Option<f64> {
        self.revealed(SequenceKind::Component, name)
    }

    pub fn connection(&self, conn: &Connection) -> Option<f64> {
        self.revealed(SequenceKind::Connection, &conn.id())
    }

    pub fn note(&self, note: &Note) -> Option<f64> {
        match self {
            RevealPlan::Full => Some(1.0),
            RevealPlan::Partial { anchors, .. } => {
                if let Some(opacity) = self.revealed(SequenceKind::Note, &note.text) {
                    return Some(opacity);
                }
                anchors
                    .iter()
                    .any(|(x, y)| {
                        (x - note.x).abs() <= NOTE_PROXIMITY && (y - note.y).abs() <= NOTE_PROXIMITY
                    })
                    .then_some(1.0)
            }
        }
    }

    /// Opacity multiplier for an overlay; overlays the sequence does not
    /// mention stay visible.
    pub fn overlay(&self, kind: OverlayKind, id: &str) -> Option<f64> {
        let kind = match kind {
            OverlayKind::Text => SequenceKind::Text,
            OverlayKind::Icon => SequenceKind::Icon,
            OverlayKind::Image => SequenceKind::Image,
            OverlayKind::Shape => SequenceKind::Shape,
            OverlayKind::Path => SequenceKind::Drawing,
        };
        match self {
            RevealPlan::Full => Some(1.0),
            RevealPlan::Partial { sequenced, .. } => {
                if sequenced.contains(&(kind, id.to_string())) {
                    self.revealed(kind, id)
                } else {
                    Some(1.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wm_core::parse_map;

    fn recorded_map() -> WardleyMap {
        let mut map = parse_map(
            "component A [0.5, 0.5]\ncomponent B [0.2, 0.2]\nA -> B\nnote Near A [0.55, 0.45]\nnote Far away [0.9, 0.9]",
        );
        map.sequence.toggle(SequenceKind::Component, "A");
        map.sequence.toggle(SequenceKind::Connection, "A->B");
        map
    }

    #[test]
    fn step_zero_shows_everything() {
        let map = recorded_map();
        let plan = reveal_plan(&map, 0);
        assert!(plan.is_full());
        assert_eq!(plan.component("B"), Some(1.0));
    }

    #[test]
    fn step_one_shows_first_item_highlighted() {
        let map = recorded_map();
        let plan = reveal_plan(&map, 1);
        assert_eq!(plan.component("A"), Some(LATEST_OPACITY));
        assert_eq!(plan.component("B"), None);
        assert_eq!(plan.connection(&map.connections[0]), None);
    }

    #[test]
    fn step_two_settles_previous_items() {
        let map = recorded_map();
        let plan = reveal_plan(&map, 2);
        assert_eq!(plan.component("A"), Some(1.0));
        assert_eq!(plan.connection(&map.connections[0]), Some(LATEST_OPACITY));
    }

    #[test]
    fn notes_follow_revealed_components() {
        let map = recorded_map();
        let plan = reveal_plan(&map, 1);
        assert_eq!(plan.note(&map.notes[0]), Some(1.0));
        assert_eq!(plan.note(&map.notes[1]), None);
    }

    #[test]
    fn unsequenced_overlays_stay_visible() {
        let mut map = recorded_map();
        map.sequence.toggle(SequenceKind::Shape, "box");
        let plan = reveal_plan(&map, 1);
        assert_eq!(plan.overlay(OverlayKind::Text, "caption"), Some(1.0));
        assert_eq!(plan.overlay(OverlayKind::Shape, "box"), None);
        let plan = reveal_plan(&map, 3);
        assert_eq!(plan.overlay(OverlayKind::Shape, "box"), Some(LATEST_OPACITY));
    }

    #[test]
    fn steps_past_the_end_clamp() {
        let map = recorded_map();
        assert_eq!(reveal_plan(&map, 9), reveal_plan(&map, 2));
    }
}
