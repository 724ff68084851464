//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. While a
//! presentation is on screen the arrow keys and space drive the sequencer
//! instead of editing.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Deselect,

    // ── Tools ──
    ToolMove,
    ToolText,
    ToolLine,
    ToolRectangle,
    ToolCircle,
    ToolTriangle,
    ToolPen,

    // ── Presentation ──
    NextStep,
    PreviousStep,
    TogglePlay,
    ExitPresentation,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. Returns `None` when the combo has
    /// no binding in the given mode.
    pub fn resolve(key: &str, mods: Modifiers, presenting: bool) -> Option<ShortcutAction> {
        if presenting {
            return match key {
                "ArrowRight" | "PageDown" | " " => Some(ShortcutAction::NextStep),
                "ArrowLeft" | "PageUp" => Some(ShortcutAction::PreviousStep),
                "p" | "P" => Some(ShortcutAction::TogglePlay),
                "Escape" => Some(ShortcutAction::ExitPresentation),
                _ => None,
            };
        }

        let cmd = mods.command();
        if cmd && mods.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }
        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }
        if mods.alt || mods.shift {
            return None;
        }

        match key {
            "v" | "V" => Some(ShortcutAction::ToolMove),
            "t" | "T" => Some(ShortcutAction::ToolText),
            "l" | "L" => Some(ShortcutAction::ToolLine),
            "r" | "R" => Some(ShortcutAction::ToolRectangle),
            "o" | "O" => Some(ShortcutAction::ToolCircle),
            "g" | "G" => Some(ShortcutAction::ToolTriangle),
            "p" | "P" => Some(ShortcutAction::ToolPen),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
