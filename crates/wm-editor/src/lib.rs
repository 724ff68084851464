pub mod config;
pub mod editor;
pub mod export;
pub mod history;
pub mod input;
pub mod interaction;
pub mod overlays;
pub mod presenter;
pub mod sequencer;
pub mod shortcuts;
pub mod storage;

pub use config::EditorConfig;
pub use editor::{Editor, Tool};
pub use export::{DirectorySink, ExportError, ExportOutcome, export_filename, export_image};
pub use history::History;
pub use input::InputEvent;
pub use interaction::{DragTarget, Interaction};
pub use presenter::{
    ChannelError, LoopbackChannel, PresenterChannel, PresenterMessage, RemoteCommand,
    RemotePresenter,
};
pub use sequencer::{ManualTimer, PlaybackState, Sequencer, Timer, TimerId};
pub use storage::{
    KeyValueStore, MemoryStore, ProjectRecord, ProjectStore, StoreError, generate_project_name,
};

use wm_core::{WardleyMap, parse_map};

/// One undoable state of the editor: the notation text together with the
/// map it produced and the overlays layered on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub source: String,
    pub map: WardleyMap,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            source: source.to_string(),
            map: parse_map(source),
        }
    }

    /// New source text, re-parsed, keeping overlays and the sequence.
    pub fn with_source(&self, source: &str) -> Self {
        Self {
            source: source.to_string(),
            map: self.map.with_notation_from(parse_map(source)),
        }
    }
}
