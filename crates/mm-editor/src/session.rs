//! Editor session: the mind map plus everything around it.
//!
//! `MindMapEditor` owns the tree, the layout settings, the canvas view and
//! the selection. It is the single place where a structural edit is
//! followed by sizing and re-layout, so callers never see a stale layout.
//!
//! Keyboard and pointer input arrive as `EditorIntent`s (see `apply` and
//! `handle_input`); hosts can also call the typed methods directly.

use crate::commands::EditorIntent;
use crate::input::InputEvent;
use crate::selection::Selection;
use crate::shortcuts::ShortcutMap;
use crate::tools::PointerTool;
use mm_core::{
    CanvasView, Connector, DEFAULT_ALIGN_THRESHOLD, DEFAULT_EXPORT_PADDING, DEFAULT_MAX_DEPTH,
    Deleted, Direction, Document, ExportBounds, LayoutConfig, LayoutConfigPatch, MindMap,
    MindMapError, NodeBox, NodeId, Result, StylePatch, ViewLimits, auto_layout, connectors,
    export_bounds, export_snapshot, find_nearest, hit_test, import_snapshot, render_boxes,
};

/// Session-level settings. Layout spacing lives in `LayoutConfig`, which
/// travels with documents; these do not.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Cross-axis tolerance for arrow-key navigation.
    pub nav_threshold: f32,
    /// Deepest nesting accepted on import and reachable by `add_child`.
    pub max_depth: usize,
    /// Margin added around the visible tree by `export_bounds`.
    pub export_padding: f32,
    /// Label given to nodes created without explicit text.
    pub default_text: String,
    /// Label of the root in a new document.
    pub root_text: String,
    pub view_limits: ViewLimits,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            nav_threshold: DEFAULT_ALIGN_THRESHOLD,
            max_depth: DEFAULT_MAX_DEPTH,
            export_padding: DEFAULT_EXPORT_PADDING,
            default_text: "New node".to_string(),
            root_text: "Mind Map".to_string(),
            view_limits: ViewLimits::default(),
        }
    }
}

pub struct MindMapEditor {
    map: MindMap,
    layout: LayoutConfig,
    view: CanvasView,
    selection: Selection,
    pointer: PointerTool,
    settings: EditorConfig,
}

impl Default for MindMapEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

fn nothing_selected() -> MindMapError {
    MindMapError::InvalidOperation("no node is selected".into())
}

impl MindMapEditor {
    /// Start with a fresh document containing only the root.
    pub fn new(settings: EditorConfig) -> Self {
        let mut editor = Self {
            map: MindMap::new(&settings.root_text),
            layout: LayoutConfig::default(),
            view: CanvasView::new(settings.view_limits),
            selection: Selection::None,
            pointer: PointerTool::new(),
            settings,
        };
        editor.relayout();
        editor
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn map(&self) -> &MindMap {
        &self.map
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selection.selected()
    }

    pub fn editing(&self) -> Option<NodeId> {
        self.selection.editing()
    }

    pub fn settings(&self) -> &EditorConfig {
        &self.settings
    }

    /// Recompute sizes and positions of the visible tree.
    pub fn relayout(&mut self) {
        auto_layout(&mut self.map, &self.layout);
    }

    // ─── Structure ───────────────────────────────────────────────────────

    fn selected_or_err(&self) -> Result<NodeId> {
        self.selection.selected().ok_or_else(nothing_selected)
    }

    /// Append a child to the selected node and select it.
    ///
    /// Refused with `InvalidOperation` when the child would sit deeper than
    /// `max_depth`; such a tree could be saved but never loaded.
    pub fn add_child(&mut self, text: Option<&str>) -> Result<NodeId> {
        let parent = self.selected_or_err()?;
        let parent_level = self
            .map
            .get(parent)
            .ok_or_else(|| MindMapError::unknown_node(parent))?
            .level;
        if parent_level as usize + 1 > self.settings.max_depth {
            return Err(MindMapError::InvalidOperation(format!(
                "a child of `{parent}` would exceed the maximum depth of {}",
                self.settings.max_depth
            )));
        }
        let text = text.unwrap_or(&self.settings.default_text).to_string();
        let id = self.map.create_child(parent, &text)?;
        self.map.calculate_size(id)?;
        self.relayout();
        self.selection.select(Some(id));
        Ok(id)
    }

    /// Insert a sibling right after the selected node and select it.
    pub fn add_sibling(&mut self, text: Option<&str>) -> Result<NodeId> {
        let anchor = self.selected_or_err()?;
        let text = text.unwrap_or(&self.settings.default_text).to_string();
        let id = self.map.create_sibling(anchor, &text)?;
        self.map.calculate_size(id)?;
        self.relayout();
        self.selection.select(Some(id));
        Ok(id)
    }

    pub fn delete_selected(&mut self) -> Result<Deleted> {
        let id = self.selected_or_err()?;
        self.delete(id)
    }

    /// Delete a subtree. If the selection was inside it, the parent of the
    /// deleted node becomes selected.
    pub fn delete(&mut self, id: NodeId) -> Result<Deleted> {
        let deleted = self.map.delete_node(id)?;
        self.selection.on_deleted(&deleted.removed, deleted.parent);
        self.relayout();
        Ok(deleted)
    }

    pub fn rename(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.map.rename(id, text)?;
        self.map.calculate_size(id)?;
        self.relayout();
        Ok(())
    }

    pub fn restyle(&mut self, id: NodeId, patch: &StylePatch) -> Result<()> {
        self.map.restyle(id, patch)?;
        if patch.affects_size() {
            self.map.calculate_size(id)?;
            self.relayout();
        }
        Ok(())
    }

    /// Collapse or expand `id`. A selection that disappears into the
    /// collapsed subtree moves up to `id`.
    pub fn toggle_collapse(&mut self, id: NodeId) -> Result<bool> {
        if !self.map.toggle_collapse(id)? {
            return Ok(false);
        }
        if let Some(sel) = self.selection.selected()
            && !self.map.is_visible(sel)
        {
            self.selection.select(Some(id));
        }
        self.relayout();
        Ok(true)
    }

    /// Drag a node (and its subtree) to `(x, y)`. Not followed by layout:
    /// the manual position holds until the next structural edit.
    pub fn move_node(&mut self, id: NodeId, x: f32, y: f32) -> Result<()> {
        self.map.move_node(id, x, y)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: Option<NodeId>) -> Result<()> {
        if let Some(id) = id
            && !self.map.contains(id)
        {
            return Err(MindMapError::unknown_node(id));
        }
        self.selection.select(id);
        Ok(())
    }

    pub fn start_editing(&mut self, id: NodeId) -> Result<()> {
        if !self.map.contains(id) {
            return Err(MindMapError::unknown_node(id));
        }
        self.selection.start_editing(id);
        Ok(())
    }

    pub fn stop_editing(&mut self) {
        self.selection.stop_editing();
    }

    /// Move the selection to the nearest visible node in `direction`.
    /// Returns the newly selected node; the selection is unchanged when
    /// nothing lies that way.
    pub fn navigate(&mut self, direction: Direction) -> Result<Option<NodeId>> {
        let from = self.selected_or_err()?;
        let next = find_nearest(&self.map, from, direction, self.settings.nav_threshold);
        if let Some(id) = next {
            self.selection.select(Some(id));
        }
        Ok(next)
    }

    /// Select whatever is under a screen point, or clear the selection.
    pub fn click(&mut self, screen_x: f32, screen_y: f32) -> Option<NodeId> {
        let hit = self.node_at(screen_x, screen_y);
        self.selection.select(hit);
        hit
    }

    /// Hit-test a screen point against the visible tree.
    pub fn node_at(&self, screen_x: f32, screen_y: f32) -> Option<NodeId> {
        let (x, y) = self.view.screen_to_canvas(screen_x, screen_y);
        hit_test(&self.map, x, y)
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn zoom(&mut self, delta: f32, center: Option<(f32, f32)>) -> f32 {
        self.view.zoom(delta, center)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.view.pan(dx, dy);
    }

    /// Reset zoom and park the root at the left edge, vertically centered
    /// in a `(width, height)` container. An empty or absent container
    /// resets the translation to the origin.
    pub fn center_on_root(&mut self, container: Option<(f32, f32)>) {
        let container = container.filter(|&(w, h)| w > 0.0 && h > 0.0);
        let root_height = self.map.resize_root().height;
        self.view.center_on_root(container, root_height);
    }

    // ─── Configuration ───────────────────────────────────────────────────

    pub fn update_config(&mut self, patch: &LayoutConfigPatch) -> Result<()> {
        patch.apply_to(&mut self.layout)?;
        self.relayout();
        Ok(())
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// Replace the tree with a lone root. Layout settings are kept; the
    /// view goes back to identity.
    pub fn new_document(&mut self) {
        self.map = MindMap::new(&self.settings.root_text);
        self.selection.clear();
        self.pointer = PointerTool::new();
        self.view.reset();
        self.relayout();
        log::debug!("started a new document");
    }

    pub fn export_document(&self) -> Document {
        export_snapshot(&self.map, &self.view, &self.layout)
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_document().to_json_pretty()
    }

    /// Load a document. Everything is validated before anything changes;
    /// on error the session is untouched. Stored positions are kept as
    /// they are. The canvas view and layout settings are only replaced
    /// when the document carries them.
    pub fn import_document(&mut self, doc: &Document) -> Result<()> {
        let map = import_snapshot(doc, self.settings.max_depth)?;
        let mut view = self.view;
        if let Some(stored) = &doc.canvas {
            view.restore(stored)?;
        }
        let mut layout = self.layout.clone();
        if let Some(patch) = &doc.canvas_config {
            patch.apply_to(&mut layout)?;
        }

        self.map = map;
        self.view = view;
        self.layout = layout;
        self.selection.clear();
        self.pointer = PointerTool::new();
        log::debug!("loaded document with {} nodes", self.map.node_count());
        Ok(())
    }

    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let doc = Document::from_json(text)?;
        self.import_document(&doc)
    }

    // ─── Rendering contracts ─────────────────────────────────────────────

    pub fn render_boxes(&self) -> Vec<NodeBox> {
        render_boxes(&self.map)
    }

    pub fn connectors(&self) -> Vec<Connector> {
        connectors(&self.map)
    }

    pub fn export_bounds(&self) -> ExportBounds {
        export_bounds(&self.map, self.settings.export_padding)
    }

    // ─── Intent dispatch ─────────────────────────────────────────────────

    /// Apply an intent if it makes sense in the current state. Returns
    /// whether anything happened.
    pub fn apply(&mut self, intent: EditorIntent) -> bool {
        if self.selection.is_editing() && !intent.allowed_while_editing() {
            log::trace!("ignoring {intent:?} while editing");
            return false;
        }
        if intent.needs_selection() && self.selection.selected().is_none() {
            log::trace!("ignoring {intent:?} without a selection");
            return false;
        }

        let outcome = match intent {
            EditorIntent::AddChild => self.add_child(None).map(|_| true),
            EditorIntent::AddSibling => self.add_sibling(None).map(|_| true),
            EditorIntent::Delete => self.delete_selected().map(|_| true),
            EditorIntent::ToggleCollapse => self
                .selected_or_err()
                .and_then(|id| self.toggle_collapse(id)),
            EditorIntent::StartEdit => self
                .selected_or_err()
                .and_then(|id| self.start_editing(id))
                .map(|()| true),
            EditorIntent::StopEdit => {
                let was_editing = self.selection.is_editing();
                self.stop_editing();
                Ok(was_editing)
            }
            EditorIntent::Navigate(direction) => self.navigate(direction).map(|n| n.is_some()),
            EditorIntent::Select(id) => self.select(id).map(|()| true),
            EditorIntent::MoveBy { id, dx, dy } => match self.map.get(id) {
                Some(node) => {
                    let (x, y) = (node.x + dx, node.y + dy);
                    self.move_node(id, x, y).map(|()| true)
                }
                None => Err(MindMapError::unknown_node(id)),
            },
            EditorIntent::Pan { dx, dy } => {
                self.pan(dx, dy);
                Ok(true)
            }
            EditorIntent::Zoom { delta, center } => {
                self.zoom(delta, center);
                Ok(true)
            }
        };

        match outcome {
            Ok(applied) => applied,
            Err(e) => {
                log::debug!("{intent:?} not applied: {e}");
                false
            }
        }
    }

    /// Resolve and apply a key press. Returns whether anything happened.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match ShortcutMap::resolve(key, self.selection.is_editing()) {
            Some(intent) => self.apply(intent),
            None => false,
        }
    }

    /// Feed a pointer event through the pointer tool and apply the
    /// resulting intents. Returns whether any of them applied.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let hit = match event {
            InputEvent::PointerDown { x, y, .. } => self.node_at(*x, *y),
            _ => None,
        };
        let intents = self.pointer.handle(event, hit, self.view.scale);
        intents
            .into_iter()
            .fold(false, |applied, intent| self.apply(intent) | applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor_with_selection() -> MindMapEditor {
        let mut editor = MindMapEditor::default();
        let root = editor.map().root_id();
        editor.select(Some(root)).unwrap();
        editor
    }

    #[test]
    fn new_editor_has_laid_out_root() {
        let editor = MindMapEditor::default();
        let root = editor.map().root();
        assert_eq!(root.text, "Mind Map");
        assert_eq!((root.x, root.y), (0.0, 0.0));
        assert!(root.width >= mm_core::MIN_WIDTH);
        assert_eq!(editor.selection(), Selection::None);
    }

    #[test]
    fn add_child_selects_and_lays_out() {
        let mut editor = editor_with_selection();
        let a = editor.add_child(None).unwrap();
        assert_eq!(editor.selected(), Some(a));
        let node = editor.map().get(a).unwrap();
        assert_eq!(node.text, "New node");
        assert_eq!(node.x, editor.layout_config().level_width);
        assert_eq!(node.y, 0.0);
    }

    #[test]
    fn structural_intents_need_a_selection() {
        let mut editor = MindMapEditor::default();
        assert!(!editor.apply(EditorIntent::AddChild));
        assert!(!editor.apply(EditorIntent::Delete));
        assert_eq!(editor.map().node_count(), 1);
    }

    #[test]
    fn root_cannot_be_deleted_or_get_siblings() {
        let mut editor = editor_with_selection();
        assert!(matches!(
            editor.delete_selected(),
            Err(MindMapError::InvalidOperation(_))
        ));
        assert!(!editor.apply(EditorIntent::AddSibling));
        assert_eq!(editor.map().node_count(), 1);
        assert_eq!(editor.selected(), Some(editor.map().root_id()));
    }

    #[test]
    fn editing_blocks_everything_but_stop() {
        let mut editor = editor_with_selection();
        assert!(editor.apply(EditorIntent::StartEdit));
        assert!(editor.selection().is_editing());

        assert!(!editor.apply(EditorIntent::AddChild));
        assert!(!editor.apply(EditorIntent::Navigate(Direction::Right)));
        assert_eq!(editor.map().node_count(), 1);

        assert!(editor.apply(EditorIntent::StopEdit));
        assert!(!editor.selection().is_editing());
        assert!(!editor.apply(EditorIntent::StopEdit));
    }

    #[test]
    fn collapsing_hides_selection_into_the_collapsed_node() {
        let mut editor = editor_with_selection();
        let a = editor.add_child(Some("a")).unwrap();
        let a1 = editor.add_child(Some("a1")).unwrap();
        assert_eq!(editor.selected(), Some(a1));

        assert!(editor.toggle_collapse(a).unwrap());
        assert_eq!(editor.selected(), Some(a));
        assert!(!editor.map().is_visible(a1));
    }

    #[test]
    fn update_config_relayouts_and_rejects_bad_values() {
        let mut editor = editor_with_selection();
        let a = editor.add_child(None).unwrap();
        let patch = LayoutConfigPatch {
            level_width: Some(300.0),
            ..Default::default()
        };
        editor.update_config(&patch).unwrap();
        assert_eq!(editor.map().get(a).unwrap().x, 300.0);

        let bad = LayoutConfigPatch {
            node_height: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            editor.update_config(&bad),
            Err(MindMapError::InvalidData(_))
        ));
        assert_eq!(editor.layout_config().node_height, 60.0);
    }

    #[test]
    fn add_child_stops_at_max_depth() {
        let mut editor = MindMapEditor::new(EditorConfig {
            max_depth: 3,
            ..Default::default()
        });
        editor.select(Some(editor.map().root_id())).unwrap();
        for _ in 0..3 {
            editor.add_child(None).unwrap();
        }
        let deepest = editor.selected().unwrap();
        assert_eq!(editor.map().get(deepest).unwrap().level, 3);

        assert!(matches!(
            editor.add_child(None),
            Err(MindMapError::InvalidOperation(_))
        ));
        assert!(!editor.apply(EditorIntent::AddChild));
        assert_eq!(editor.map().node_count(), 4);
        assert_eq!(editor.selected(), Some(deepest));
        // Siblings stay on the same level and are still allowed.
        editor.add_sibling(None).unwrap();
    }

    #[test]
    fn invalid_view_limits_fall_back_to_defaults() {
        let mut editor = MindMapEditor::new(EditorConfig {
            view_limits: ViewLimits {
                min_scale: 3.0,
                max_scale: 0.1,
            },
            ..Default::default()
        });
        assert_eq!(editor.view().limits, ViewLimits::default());
        assert_eq!(editor.zoom(5.0, None), 3.0);
    }

    #[test]
    fn center_on_root_uses_root_height() {
        let mut editor = MindMapEditor::default();
        editor.zoom(1.0, None);
        editor.center_on_root(Some((800.0, 600.0)));
        let root_height = editor.map().root().height;
        assert_eq!(editor.view().scale, 1.0);
        assert_eq!(editor.view().translate_x, 50.0);
        assert_eq!(editor.view().translate_y, 300.0 - root_height / 2.0);

        editor.center_on_root(Some((0.0, 600.0)));
        assert_eq!(editor.view().translate_x, 0.0);
        assert_eq!(editor.view().translate_y, 0.0);
    }
}
