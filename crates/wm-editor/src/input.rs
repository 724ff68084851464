//! Input abstraction layer.
//!
//! Hosts translate their mouse and keyboard events into [`InputEvent`]s in
//! canvas pixel coordinates and feed them to the editor.

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// The platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    /// The pointer left the canvas; any gesture in progress ends.
    PointerLeave,
    /// Secondary click, which opens the delete action.
    ContextMenu { x: f64, y: f64 },
    /// `key` is the DOM `KeyboardEvent.key` value, e.g. `"z"` or `"Escape"`.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::ContextMenu { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}
