//! Integration tests: record → present → autoplay, mirrored to a presenter.
//!
//! Drives the editor the way a host would: canvas clicks in pixels, timer
//! ticks delivered by hand, and a presenter surface on a loopback channel.

use pretty_assertions::assert_eq;
use wm_core::{SequenceItem, SequenceKind, Viewport};
use wm_editor::input::Modifiers;
use wm_editor::{
    Editor, EditorConfig, LoopbackChannel, ManualTimer, PlaybackState, RemoteCommand,
    RemotePresenter,
};

const TEA_SHOP: &str = include_str!("fixtures/tea_shop.wm");

fn editor(source: &str, timer: &ManualTimer) -> Editor {
    let config = EditorConfig {
        viewport: Viewport::new(1100.0, 1100.0),
        ..Default::default()
    };
    Editor::new(source, config, Box::new(timer.clone()))
}

fn click(editor: &mut Editor, x: f64, y: f64) {
    let p = editor.viewport().to_pixel(x, y);
    editor.pointer_down(p);
    editor.finish_gesture();
}

fn item(kind: SequenceKind, id: &str, order: u32) -> SequenceItem {
    SequenceItem {
        kind,
        target_id: id.to_string(),
        order,
    }
}

#[test]
fn record_component_and_connection_then_autoplay() {
    let timer = ManualTimer::new();
    let mut e = editor("component A [0.5, 0.5]\ncomponent B [0.2, 0.2]\nA -> B", &timer);

    e.start_recording();
    click(&mut e, 0.5, 0.5);
    click(&mut e, 0.35, 0.35);
    e.stop_recording();
    assert_eq!(
        e.map().sequence.items,
        vec![
            item(SequenceKind::Component, "A", 1),
            item(SequenceKind::Connection, "A->B", 2),
        ]
    );

    e.enter_presentation();
    assert!(e.play());

    let tick = timer.fire_next().expect("first tick");
    e.on_timer(tick);
    let plan = e.reveal_plan();
    assert_eq!(plan.component("A"), Some(0.7));
    assert_eq!(plan.component("B"), None);

    let tick = timer.fire_next().expect("second tick");
    e.on_timer(tick);
    let plan = e.reveal_plan();
    assert_eq!(plan.component("A"), Some(1.0));
    assert_eq!(plan.connection(&e.map().connections[0]), Some(0.7));

    let tick = timer.fire_next().expect("closing tick");
    e.on_timer(tick);
    assert_eq!(e.sequencer().state(), PlaybackState::Ready);
    assert_eq!(e.sequencer().step(), 0);
    assert!(timer.fire_next().is_none());
}

#[test]
fn removing_a_middle_item_renumbers() {
    let timer = ManualTimer::new();
    let mut e = editor(TEA_SHOP, &timer);
    let map = e.map().clone();
    let pos = |name: &str| {
        let c = map.component(name).expect("declared");
        (c.x, c.y)
    };

    e.start_recording();
    for name in ["Business", "Kettle", "Power", "Kettle"] {
        let (x, y) = pos(name);
        click(&mut e, x, y);
    }
    e.stop_recording();
    assert_eq!(
        e.map().sequence.items,
        vec![
            item(SequenceKind::Component, "Business", 1),
            item(SequenceKind::Component, "Power", 2),
        ]
    );
}

#[test]
fn presenter_mirrors_and_drives_playback() {
    let timer = ManualTimer::new();
    let mut e = editor("component A [0.5, 0.5]\ncomponent B [0.2, 0.2]\nA -> B", &timer);
    e.start_recording();
    click(&mut e, 0.5, 0.5);
    click(&mut e, 0.2, 0.2);
    e.stop_recording();
    e.enter_presentation();

    let (editor_end, presenter_end) = LoopbackChannel::pair();
    e.connect_presenter(Box::new(editor_end));
    let mut presenter = RemotePresenter::connect(presenter_end).expect("connects");
    e.pump_presenter();
    assert!(presenter.pump());
    let view = presenter.view().expect("initial state");
    assert_eq!(view.current_step, 0);
    assert_eq!(presenter.next_item().map(|i| i.target_id), Some("A".to_string()));

    presenter.send(RemoteCommand::Next).expect("open");
    e.pump_presenter();
    assert_eq!(e.sequencer().step(), 1);
    presenter.pump();
    assert_eq!(presenter.current_item().map(|i| i.target_id), Some("A".to_string()));
    assert_eq!(presenter.next_item().map(|i| i.target_id), Some("B".to_string()));

    presenter.send(RemoteCommand::Play).expect("open");
    e.pump_presenter();
    presenter.pump();
    assert!(presenter.view().is_some_and(|v| v.is_playing));

    e.key("ArrowLeft", Modifiers::default());
    assert_eq!(e.sequencer().state(), PlaybackState::Ready);
    assert!(timer.pending().is_empty());
    presenter.pump();
    assert!(presenter.view().is_some_and(|v| !v.is_playing && v.current_step == 0));
}

#[test]
fn undoing_a_recording_click_restores_the_sequence() {
    let timer = ManualTimer::new();
    let mut e = editor("component A [0.5, 0.5]\ncomponent B [0.2, 0.2]", &timer);
    e.start_recording();
    click(&mut e, 0.5, 0.5);
    click(&mut e, 0.2, 0.2);
    e.undo();
    assert_eq!(e.map().sequence.len(), 1);
    assert_eq!(e.sequencer().state(), PlaybackState::Recording);
    e.stop_recording();
    assert_eq!(e.sequencer().state(), PlaybackState::Ready);
}
