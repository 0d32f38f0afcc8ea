//! Core data model for mind maps.
//!
//! The tree is an arena: nodes live in a petgraph `StableDiGraph` whose
//! edges go parent → child, with an explicit child order per node and an
//! `id → index` lookup. A node's parent is derived from its single incoming
//! edge and is never an ownership relation. Every structural mutation keeps
//! the graph, the child order and the index in step.

use crate::error::{MindMapError, Result};
use crate::id::NodeId;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Smallest width a node box ever gets.
pub const MIN_WIDTH: f32 = 100.0;

/// Estimated glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Horizontal offset from the parent used to seed a new child's position.
const SEED_OFFSET_X: f32 = 200.0;

/// Vertical step used to seed new children and siblings.
const SEED_STEP_Y: f32 = 60.0;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits: SmallVec<[u8; 8]> = hex
            .bytes()
            .map(hex_val)
            .collect::<Option<SmallVec<[u8; 8]>>>()?;

        let channels: SmallVec<[u8; 4]> = match digits.len() {
            3 | 4 => digits.iter().map(|d| d * 17).collect(),
            6 | 8 => digits.chunks(2).map(|p| (p[0] << 4) | p[1]).collect(),
            _ => return None,
        };
        let alpha = channels.get(3).copied().unwrap_or(255);
        Some(Self::rgba(
            channels[0] as f32 / 255.0,
            channels[1] as f32 / 255.0,
            channels[2] as f32 / 255.0,
            alpha as f32 / 255.0,
        ))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = [self.r, self.g, self.b, self.a].map(|c| (c * 255.0).round() as u8);
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Styling ─────────────────────────────────────────────────────────────

/// Visual style of one node. Every node owns its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub background_color: Color,
    pub text_color: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub border_radius: f32,
    pub font_size: f32,
    pub font_weight: String,
    pub font_family: String,
    pub padding: f32,
}

impl Default for NodeStyle {
    /// The style every new non-root node starts from.
    fn default() -> Self {
        Self {
            background_color: Color::rgb8(0xFF, 0xFF, 0xFF),
            text_color: Color::rgb8(0x33, 0x33, 0x33),
            border_color: Color::rgb8(0x18, 0x90, 0xFF),
            border_width: 2.0,
            border_radius: 8.0,
            font_size: 14.0,
            font_weight: "normal".into(),
            font_family: "Arial, sans-serif".into(),
            padding: 12.0,
        }
    }
}

impl NodeStyle {
    /// The root node's emphasized style.
    pub fn root() -> Self {
        Self {
            background_color: Color::rgb8(0x18, 0x90, 0xFF),
            text_color: Color::rgb8(0xFF, 0xFF, 0xFF),
            border_color: Color::rgb8(0x09, 0x6D, 0xD9),
            font_size: 16.0,
            font_weight: "bold".into(),
            padding: 16.0,
            ..Self::default()
        }
    }
}

/// Partial style update: only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StylePatch {
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
    pub border_color: Option<Color>,
    pub border_width: Option<f32>,
    pub border_radius: Option<f32>,
    pub font_size: Option<f32>,
    pub font_weight: Option<String>,
    pub font_family: Option<String>,
    pub padding: Option<f32>,
}

impl StylePatch {
    /// Merge into `dst`, overwriting only the fields set here.
    pub fn apply_to(&self, dst: &mut NodeStyle) {
        if let Some(c) = self.background_color {
            dst.background_color = c;
        }
        if let Some(c) = self.text_color {
            dst.text_color = c;
        }
        if let Some(c) = self.border_color {
            dst.border_color = c;
        }
        if let Some(w) = self.border_width {
            dst.border_width = w;
        }
        if let Some(r) = self.border_radius {
            dst.border_radius = r;
        }
        if let Some(s) = self.font_size {
            dst.font_size = s;
        }
        if let Some(w) = &self.font_weight {
            dst.font_weight = w.clone();
        }
        if let Some(f) = &self.font_family {
            dst.font_family = f.clone();
        }
        if let Some(p) = self.padding {
            dst.padding = p;
        }
    }

    /// Whether applying this patch changes the node's computed size.
    pub fn affects_size(&self) -> bool {
        self.font_size.is_some() || self.padding.is_some()
    }

    fn validate(&self) -> Result<()> {
        let sizes = [
            ("fontSize", self.font_size),
            ("padding", self.padding),
            ("borderWidth", self.border_width),
            ("borderRadius", self.border_radius),
        ];
        for (name, value) in sizes {
            if let Some(v) = value
                && !(v.is_finite() && v >= 0.0)
            {
                return Err(MindMapError::InvalidOperation(format!(
                    "style field `{name}` must be a finite non-negative number, got {v}"
                )));
            }
        }
        if self.font_size == Some(0.0) {
            return Err(MindMapError::InvalidOperation(
                "style field `fontSize` must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A single topic in the mind map.
///
/// `x`/`y` are the center of the node box in canvas space. They are
/// written by the layout pass (or an explicit move), never by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct MindNode {
    pub id: NodeId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: NodeStyle,
    pub collapsed: bool,
    pub level: u32,
}

impl MindNode {
    pub(crate) fn new(id: NodeId, text: &str, level: u32, style: NodeStyle) -> Self {
        let mut node = Self {
            id,
            text: text.to_string(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            style,
            collapsed: false,
            level,
        };
        node.calculate_size();
        node
    }

    /// Recompute `width`/`height` from text length, font size and padding.
    pub fn calculate_size(&mut self) {
        let padding = self.style.padding;
        let font_size = self.style.font_size;
        let text_width = self.text.chars().count() as f32 * font_size * CHAR_WIDTH_FACTOR;
        self.width = MIN_WIDTH.max(text_width + padding * 2.0);
        self.height = (font_size + padding * 2.0).max(0.0);
    }
}

/// Outcome of a successful `delete_node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    /// The former parent of the deleted node.
    pub parent: NodeId,
    /// Every id that left the tree, the deleted node first.
    pub removed: Vec<NodeId>,
}

// ─── Tree ────────────────────────────────────────────────────────────────

/// The mind-map tree: exactly one root, every other node owned by exactly
/// one parent.
#[derive(Debug, Clone)]
pub struct MindMap {
    graph: StableDiGraph<MindNode, ()>,
    root: NodeIndex,
    id_index: HashMap<NodeId, NodeIndex>,
    child_order: HashMap<NodeIndex, SmallVec<[NodeIndex; 4]>>,
}

impl MindMap {
    /// A new document: a single root node at the origin.
    #[must_use]
    pub fn new(root_text: &str) -> Self {
        Self::with_root(MindNode::new(NodeId::generate(), root_text, 0, NodeStyle::root()))
    }

    pub(crate) fn with_root(root: MindNode) -> Self {
        let mut graph = StableDiGraph::new();
        let id = root.id;
        let root = graph.add_node(root);
        let mut id_index = HashMap::new();
        id_index.insert(id, root);
        Self {
            graph,
            root,
            id_index,
            child_order: HashMap::new(),
        }
    }

    /// Attach an already-built node as the last child of `parent`.
    /// Callers guarantee `parent` exists and the id is fresh.
    pub(crate) fn attach(&mut self, parent: NodeIndex, node: MindNode) -> NodeIndex {
        let pos = self.children(parent).len();
        self.insert_at(parent, pos, node)
    }

    fn insert_at(&mut self, parent: NodeIndex, pos: usize, node: MindNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        self.child_order.entry(parent).or_default().insert(pos, idx);
        idx
    }

    /// A generated id that no node in this tree uses yet.
    fn fresh_id(&self) -> NodeId {
        loop {
            let id = NodeId::generate();
            if !self.id_index.contains_key(&id) {
                return id;
            }
        }
    }

    fn require(&self, id: NodeId) -> Result<NodeIndex> {
        self.index_of(id).ok_or_else(|| MindMapError::unknown_node(id))
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    pub fn root_id(&self) -> NodeId {
        self.graph[self.root].id
    }

    pub fn root(&self) -> &MindNode {
        &self.graph[self.root]
    }

    /// Recompute the root's size and return it. The root always exists, so
    /// unlike `calculate_size` this cannot fail.
    pub fn resize_root(&mut self) -> &MindNode {
        let root = &mut self.graph[self.root];
        root.calculate_size();
        root
    }

    pub(crate) fn root_index(&self) -> NodeIndex {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&MindNode> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut MindNode> {
        self.index_of(id).map(|idx| &mut self.graph[idx])
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &MindNode {
        &self.graph[idx]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut MindNode {
        &mut self.graph[idx]
    }

    /// Parent index, derived from the single incoming edge.
    pub(crate) fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph.neighbors_directed(idx, Direction::Incoming).next()
    }

    /// Ordered children of a node.
    pub(crate) fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order
            .get(&idx)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    /// Children that take part in layout: none when collapsed.
    pub(crate) fn visible_children(&self, idx: NodeIndex) -> &[NodeIndex] {
        if self.graph[idx].collapsed {
            &[]
        } else {
            self.children(idx)
        }
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.index_of(id)?;
        self.parent(idx).map(|p| self.graph[p].id)
    }

    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.index_of(id)
            .map(|idx| self.children(idx).iter().map(|&c| self.graph[c].id).collect())
            .unwrap_or_default()
    }

    /// Check if `ancestor` is a parent/grandparent/etc. of `descendant`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        let Some(mut current) = self.index_of(descendant) else {
            return false;
        };
        while let Some(parent) = self.parent(current) {
            if self.graph[parent].id == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Pre-order walk. With `visible_only`, children of collapsed nodes are
    /// skipped.
    pub(crate) fn preorder(&self, visible_only: bool) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.graph.node_count());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            let children = if visible_only {
                self.visible_children(idx)
            } else {
                self.children(idx)
            };
            stack.extend(children.iter().rev());
        }
        out
    }

    /// Every node in the tree, pre-order.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        self.preorder(false).into_iter().map(|i| self.graph[i].id).collect()
    }

    /// Nodes not hidden under a collapsed ancestor, pre-order.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        self.preorder(true).into_iter().map(|i| self.graph[i].id).collect()
    }

    /// True when no ancestor of `id` is collapsed.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(mut current) = self.index_of(id) else {
            return false;
        };
        while let Some(parent) = self.parent(current) {
            if self.graph[parent].collapsed {
                return false;
            }
            current = parent;
        }
        true
    }

    /// Visit every node in arena order (not tree order).
    pub(crate) fn for_each_node_mut(&mut self, mut f: impl FnMut(&mut MindNode)) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for idx in indices {
            f(&mut self.graph[idx]);
        }
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &MindNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    // ─── Structural mutation ─────────────────────────────────────────────

    /// Append a new node at the end of `parent`'s children.
    pub fn create_child(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let parent_idx = self.require(parent)?;
        let p = &self.graph[parent_idx];
        let seed_x = p.x + SEED_OFFSET_X;
        let seed_y = p.y + self.children(parent_idx).len() as f32 * SEED_STEP_Y;

        let id = self.fresh_id();
        let mut node = MindNode::new(id, text, p.level + 1, NodeStyle::default());
        node.x = seed_x;
        node.y = seed_y;
        self.attach(parent_idx, node);
        log::debug!("created child {id} under {parent}");
        Ok(id)
    }

    /// Insert a new node immediately after `node` in its parent's children.
    pub fn create_sibling(&mut self, node: NodeId, text: &str) -> Result<NodeId> {
        let idx = self.require(node)?;
        let parent_idx = self.parent(idx).ok_or_else(|| {
            MindMapError::InvalidOperation("the root node cannot have a sibling".into())
        })?;
        let pos = self
            .children(parent_idx)
            .iter()
            .position(|&c| c == idx)
            .map_or(0, |p| p + 1);

        let anchor = &self.graph[idx];
        let (seed_x, seed_y, level) = (anchor.x, anchor.y + SEED_STEP_Y, anchor.level);
        let id = self.fresh_id();
        let mut sibling = MindNode::new(id, text, level, NodeStyle::default());
        sibling.x = seed_x;
        sibling.y = seed_y;
        self.insert_at(parent_idx, pos, sibling);
        log::debug!("created sibling {id} after {node}");
        Ok(id)
    }

    /// Detach `node` from its parent and discard its whole subtree.
    pub fn delete_node(&mut self, node: NodeId) -> Result<Deleted> {
        let idx = self.require(node)?;
        let parent_idx = self.parent(idx).ok_or_else(|| {
            MindMapError::InvalidOperation("the root node cannot be deleted".into())
        })?;

        let mut subtree = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            subtree.push(current);
            stack.extend(self.children(current).iter().rev());
        }

        if let Some(siblings) = self.child_order.get_mut(&parent_idx) {
            siblings.retain(|c| *c != idx);
        }
        let mut removed = Vec::with_capacity(subtree.len());
        for current in subtree {
            self.child_order.remove(&current);
            if let Some(gone) = self.graph.remove_node(current) {
                self.id_index.remove(&gone.id);
                removed.push(gone.id);
            }
        }
        log::debug!("deleted {node} ({} nodes)", removed.len());
        Ok(Deleted {
            parent: self.graph[parent_idx].id,
            removed,
        })
    }

    /// Replace a node's label. Size and layout are the caller's to refresh.
    pub fn rename(&mut self, node: NodeId, text: &str) -> Result<()> {
        let n = self.get_mut(node).ok_or_else(|| MindMapError::unknown_node(node))?;
        n.text = text.to_string();
        Ok(())
    }

    /// Merge a partial style into a node's own style.
    pub fn restyle(&mut self, node: NodeId, patch: &StylePatch) -> Result<()> {
        patch.validate()?;
        let n = self.get_mut(node).ok_or_else(|| MindMapError::unknown_node(node))?;
        patch.apply_to(&mut n.style);
        Ok(())
    }

    /// Flip `collapsed`. Returns `false` (and changes nothing) for a node
    /// without children.
    pub fn toggle_collapse(&mut self, node: NodeId) -> Result<bool> {
        let idx = self.require(node)?;
        if self.children(idx).is_empty() {
            return Ok(false);
        }
        let n = &mut self.graph[idx];
        n.collapsed = !n.collapsed;
        log::debug!("{node} collapsed = {}", n.collapsed);
        Ok(true)
    }

    /// Recompute a node's box size from its text and style.
    pub fn calculate_size(&mut self, node: NodeId) -> Result<()> {
        let n = self.get_mut(node).ok_or_else(|| MindMapError::unknown_node(node))?;
        n.calculate_size();
        Ok(())
    }

    /// Move `node` so its center lands on `(x, y)`, carrying its whole
    /// subtree along by the same offset.
    pub fn move_node(&mut self, node: NodeId, x: f32, y: f32) -> Result<()> {
        let idx = self.require(node)?;
        let n = &self.graph[idx];
        let (dx, dy) = (x - n.x, y - n.y);

        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            let n = &mut self.graph[current];
            n.x += dx;
            n.y += dy;
            stack.extend(self.children(current).iter().copied());
        }
        Ok(())
    }

    /// Check every structural invariant. Used by tests and import.
    pub fn check_invariants(&self) -> Result<()> {
        let corrupt = |msg: String| Err(MindMapError::InvalidData(msg));
        if self.parent(self.root).is_some() {
            return corrupt("root has a parent".into());
        }
        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                return corrupt(format!("{} reachable twice", self.graph[idx].id));
            }
            let node = &self.graph[idx];
            if self.id_index.get(&node.id) != Some(&idx) {
                return corrupt(format!("{} missing from id index", node.id));
            }
            for &child in self.children(idx) {
                if self.parent(child) != Some(idx) {
                    return corrupt(format!("{} has a stale parent", self.graph[child].id));
                }
                if self.graph[child].level != node.level + 1 {
                    return corrupt(format!("{} has an inconsistent level", self.graph[child].id));
                }
                stack.push(child);
            }
        }
        if seen.len() != self.graph.node_count() || self.id_index.len() != seen.len() {
            return corrupt("tree contains unreachable nodes".into());
        }
        Ok(())
    }
}

impl Default for MindMap {
    fn default() -> Self {
        Self::new("Mind Map")
    }
}
