//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values to `EditorIntent`s. Mind-map editing is
//! driven by bare keys:
//! - Tab = add child, Enter = add sibling
//! - Delete / Backspace = delete subtree
//! - Space = edit label, Escape = finish editing
//! - Arrows = move the selection spatially
//!
//! While a label is being edited the text field owns the keyboard, so
//! Escape is the only binding.

use crate::commands::EditorIntent;
use mm_core::Direction;

/// Resolves key events into editor intents.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an intent.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Tab"`, `"ArrowUp"`).
    /// Returns `None` if the key has no binding in the current mode.
    pub fn resolve(key: &str, editing: bool) -> Option<EditorIntent> {
        if editing {
            return match key {
                "Escape" => Some(EditorIntent::StopEdit),
                _ => None,
            };
        }

        match key {
            "Tab" => Some(EditorIntent::AddChild),
            "Enter" => Some(EditorIntent::AddSibling),
            "Delete" | "Backspace" => Some(EditorIntent::Delete),
            // Older browsers report the space bar as "Spacebar".
            " " | "Spacebar" => Some(EditorIntent::StartEdit),
            "ArrowUp" => Some(EditorIntent::Navigate(Direction::Up)),
            "ArrowDown" => Some(EditorIntent::Navigate(Direction::Down)),
            "ArrowLeft" => Some(EditorIntent::Navigate(Direction::Left)),
            "ArrowRight" => Some(EditorIntent::Navigate(Direction::Right)),
            _ => None,
        }
    }
}
