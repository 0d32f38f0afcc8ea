//! Editor intents.
//!
//! Keyboard shortcuts and pointer tools both produce `EditorIntent`s; the
//! session decides whether each one applies in the current state.

use mm_core::{Direction, NodeId};

/// A semantic editing request, independent of the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorIntent {
    // ── Structure (keyboard) ──
    AddChild,
    AddSibling,
    Delete,
    ToggleCollapse,

    // ── Text editing ──
    StartEdit,
    StopEdit,

    // ── Selection ──
    Navigate(Direction),
    /// Select a node, or clear the selection with `None`.
    Select(Option<NodeId>),

    // ── Pointer ──
    /// Shift a node (and its subtree) by a canvas-space offset.
    MoveBy { id: NodeId, dx: f32, dy: f32 },
    /// Pan the view by a screen-space offset.
    Pan { dx: f32, dy: f32 },
    /// Zoom by `delta`, keeping the screen point `center` fixed if given.
    Zoom {
        delta: f32,
        center: Option<(f32, f32)>,
    },
}

impl EditorIntent {
    /// Whether this intent acts on the selected node.
    pub fn needs_selection(&self) -> bool {
        matches!(
            self,
            Self::AddChild
                | Self::AddSibling
                | Self::Delete
                | Self::ToggleCollapse
                | Self::StartEdit
                | Self::Navigate(_)
        )
    }

    /// Whether this intent still applies while a label is being edited.
    ///
    /// Only leaving edit mode and view/selection changes from the pointer
    /// get through; everything else would fight with the text field.
    pub fn allowed_while_editing(&self) -> bool {
        matches!(
            self,
            Self::StopEdit | Self::Select(_) | Self::Pan { .. } | Self::Zoom { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_intents_are_blocked_while_editing() {
        for intent in [
            EditorIntent::AddChild,
            EditorIntent::AddSibling,
            EditorIntent::Delete,
            EditorIntent::ToggleCollapse,
            EditorIntent::StartEdit,
            EditorIntent::Navigate(Direction::Up),
        ] {
            assert!(intent.needs_selection(), "{intent:?}");
            assert!(!intent.allowed_while_editing(), "{intent:?}");
        }
        assert!(EditorIntent::StopEdit.allowed_while_editing());
        assert!(!EditorIntent::StopEdit.needs_selection());
    }

    #[test]
    fn pointer_view_intents_pass_while_editing() {
        let pan = EditorIntent::Pan { dx: 1.0, dy: 2.0 };
        let zoom = EditorIntent::Zoom {
            delta: 0.1,
            center: None,
        };
        assert!(pan.allowed_while_editing());
        assert!(zoom.allowed_while_editing());
        assert!(EditorIntent::Select(None).allowed_while_editing());

        let drag = EditorIntent::MoveBy {
            id: NodeId::intern("cmd_drag"),
            dx: 1.0,
            dy: 0.0,
        };
        assert!(!drag.allowed_while_editing());
    }
}
