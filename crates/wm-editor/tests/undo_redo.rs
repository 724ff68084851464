//! Integration tests: editing gestures against the undo/redo history.
//!
//! Each pointer gesture must land as exactly one undo step, and undo must
//! restore the notation text together with the overlays.

use pretty_assertions::assert_eq;
use wm_core::{ShapeGeometry, Viewport};
use wm_editor::input::{InputEvent, Modifiers};
use wm_editor::overlays::{self, TextPatch};
use wm_editor::{Editor, EditorConfig, ManualTimer, Tool};

const TEA_SHOP: &str = include_str!("fixtures/tea_shop.wm");

fn editor(source: &str) -> Editor {
    let config = EditorConfig {
        viewport: Viewport::new(1100.0, 1100.0),
        ..Default::default()
    };
    Editor::new(source, config, Box::new(ManualTimer::new()))
}

fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    let vp = editor.viewport();
    let a = vp.to_pixel(from.0, from.1);
    let b = vp.to_pixel(to.0, to.1);
    editor.handle(InputEvent::PointerDown { x: a.x, y: a.y });
    let mid = a.midpoint(b);
    editor.handle(InputEvent::PointerMove { x: mid.x, y: mid.y });
    editor.handle(InputEvent::PointerMove { x: b.x, y: b.y });
    editor.handle(InputEvent::PointerUp { x: b.x, y: b.y });
}

fn cmd() -> Modifiers {
    Modifiers {
        ctrl: true,
        ..Default::default()
    }
}

#[test]
fn n_gestures_undo_back_to_the_start() {
    let mut e = editor(TEA_SHOP);
    let initial = e.document().clone();

    e.set_tool(Tool::Rectangle);
    drag(&mut e, (0.1, 0.9), (0.2, 0.8));
    e.set_tool(Tool::Line);
    drag(&mut e, (0.3, 0.3), (0.4, 0.4));
    e.set_tool(Tool::Pen);
    drag(&mut e, (0.6, 0.1), (0.7, 0.2));
    e.set_tool(Tool::Move);
    drag(&mut e, (0.35, 0.43), (0.45, 0.43));

    assert_eq!(e.history().past_len(), 4);
    assert!(e.source().contains("component Kettle [0.43, 0.45]"));

    for _ in 0..4 {
        assert!(e.undo());
    }
    assert!(!e.undo());
    assert_eq!(e.document(), &initial);
}

#[test]
fn redo_replays_and_new_edit_clears_it() {
    let mut e = editor("");
    e.set_tool(Tool::Circle);
    drag(&mut e, (0.5, 0.5), (0.6, 0.5));
    let drawn = e.document().clone();

    e.key("z", cmd());
    assert!(e.map().overlays.shapes.is_empty());
    e.key("y", cmd());
    assert_eq!(e.document(), &drawn);
    match e.map().overlays.shapes[0].geometry {
        ShapeGeometry::Circle { radius } => assert!((radius - 0.1).abs() < 1e-9),
        other => panic!("expected circle, got {other:?}"),
    }

    e.key("z", cmd());
    e.set_tool(Tool::Triangle);
    drag(&mut e, (0.1, 0.1), (0.2, 0.2));
    assert!(!e.history().can_redo());
    assert!(!e.redo());
}

#[test]
fn resizing_a_selected_rectangle_is_one_step() {
    let mut e = editor("");
    e.set_tool(Tool::Rectangle);
    drag(&mut e, (0.2, 0.8), (0.4, 0.6));
    e.set_tool(Tool::Move);

    // Click inside to select, then drag the south-east corner.
    let inside = e.viewport().to_pixel(0.3, 0.7);
    e.pointer_down(inside);
    e.finish_gesture();
    assert!(e.map().overlays.selected().is_some());
    let before = e.history().past_len();

    drag(&mut e, (0.4, 0.6), (0.5, 0.5));
    assert_eq!(e.history().past_len(), before + 1);
    match e.map().overlays.shapes[0].geometry {
        ShapeGeometry::Rectangle { width, height } => {
            assert!((width - 0.3).abs() < 1e-9);
            assert!((height - 0.3).abs() < 1e-9);
        }
        other => panic!("expected rectangle, got {other:?}"),
    }
}

#[test]
fn overlay_edits_and_text_typing() {
    let mut e = editor("component A [0.5, 0.5]");
    e.set_tool(Tool::Text);
    let at = e.viewport().to_pixel(0.1, 0.9);
    e.pointer_down(at);
    let id = e.map().overlays.texts[0].id;

    e.edit_overlays(|o| {
        overlays::patch_text(
            o,
            id,
            TextPatch {
                text: Some("Kettle is dated".into()),
                ..Default::default()
            },
        )
    });
    assert_eq!(e.map().overlays.texts[0].text, "Kettle is dated");
    assert_eq!(e.history().past_len(), 2);

    e.set_source("component A [0.5, 0.5]\ncomponent B [0.3, 0.3]");
    assert_eq!(e.history().past_len(), 2);
    assert_eq!(e.map().overlays.texts.len(), 1);

    e.key("Escape", Modifiers::default());
    assert_eq!(e.map().overlays.selected(), None);
    e.undo();
    assert_eq!(e.map().overlays.texts[0].text, "Text");
}
