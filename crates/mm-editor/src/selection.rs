//! Selection and text-editing state.
//!
//! At most one node is selected; the selected node may additionally be in
//! text-editing mode. Editing always implies selection.

use mm_core::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Selected(NodeId),
    Editing(NodeId),
}

impl Selection {
    /// Select a node (or nothing). Always leaves editing mode.
    pub fn select(&mut self, node: Option<NodeId>) {
        *self = match node {
            Some(id) => Selection::Selected(id),
            None => Selection::None,
        };
    }

    /// Enter editing on `node`, selecting it as well.
    pub fn start_editing(&mut self, node: NodeId) {
        *self = Selection::Editing(node);
    }

    /// Drop back from editing to plain selection. No-op otherwise.
    pub fn stop_editing(&mut self) {
        if let Selection::Editing(id) = *self {
            *self = Selection::Selected(id);
        }
    }

    /// React to a subtree removal: if the selected or edited node left the
    /// tree, select the deleted node's former parent.
    pub fn on_deleted(&mut self, removed: &[NodeId], parent: NodeId) {
        if let Some(current) = self.selected()
            && removed.contains(&current)
        {
            *self = Selection::Selected(parent);
        }
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// The selected node, whether or not it is being edited.
    pub fn selected(&self) -> Option<NodeId> {
        match *self {
            Selection::None => None,
            Selection::Selected(id) | Selection::Editing(id) => Some(id),
        }
    }

    pub fn editing(&self) -> Option<NodeId> {
        match *self {
            Selection::Editing(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Selection::Editing(_))
    }
}
