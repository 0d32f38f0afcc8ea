//! Geometry handed to the rendering and export collaborators, plus hit
//! testing for pointer input.
//!
//! Everything here reads a laid-out tree and never mutates it. Only visible
//! nodes (no collapsed ancestor) are reported.

use crate::id::NodeId;
use crate::model::{MindMap, MindNode};

/// Padding added around the export capture region.
pub const DEFAULT_EXPORT_PADDING: f32 = 100.0;

/// Absolute box of one node; `x`/`y` are its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeBox {
    pub fn of(node: &MindNode) -> Self {
        Self {
            id: node.id,
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }
}

/// A parent → child edge, anchored at the parent's right-center and the
/// child's left-center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub from: NodeId,
    pub to: NodeId,
    pub start: (f32, f32),
    pub end: (f32, f32),
}

/// Capture region for image/document export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Top-left of the padded region.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Boxes of every visible node in paint order (pre-order).
pub fn render_boxes(map: &MindMap) -> Vec<NodeBox> {
    map.preorder(true)
        .into_iter()
        .map(|idx| NodeBox::of(map.node(idx)))
        .collect()
}

/// Connector anchors for every visible parent → child edge.
pub fn connectors(map: &MindMap) -> Vec<Connector> {
    let mut out = Vec::new();
    for idx in map.preorder(true) {
        let parent = NodeBox::of(map.node(idx));
        for &child_idx in map.visible_children(idx) {
            let child = NodeBox::of(map.node(child_idx));
            out.push(Connector {
                from: parent.id,
                to: child.id,
                start: (parent.right(), parent.y),
                end: (child.left(), child.y),
            });
        }
    }
    out
}

/// Bounding box over all visible node rectangles, grown by `padding` on
/// every side.
pub fn export_bounds(map: &MindMap, padding: f32) -> ExportBounds {
    let (mut min_x, mut max_x) = (f32::INFINITY, f32::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
    for b in render_boxes(map) {
        min_x = min_x.min(b.left());
        max_x = max_x.max(b.right());
        min_y = min_y.min(b.top());
        max_y = max_y.max(b.bottom());
    }
    ExportBounds {
        min_x,
        max_x,
        min_y,
        max_y,
        x: min_x - padding,
        y: min_y - padding,
        width: max_x - min_x + padding * 2.0,
        height: max_y - min_y + padding * 2.0,
    }
}

/// Find the topmost visible node at canvas position `(px, py)`.
/// Returns `None` on background.
pub fn hit_test(map: &MindMap, px: f32, py: f32) -> Option<NodeId> {
    // Last painted = topmost.
    render_boxes(map)
        .into_iter()
        .rev()
        .find(|b| b.contains(px, py))
        .map(|b| b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, auto_layout};
    use pretty_assertions::assert_eq;

    fn laid_out() -> (MindMap, NodeId, NodeId) {
        let mut map = MindMap::new("root");
        let root = map.root_id();
        let a = map.create_child(root, "a").unwrap();
        let b = map.create_child(a, "b").unwrap();
        auto_layout(&mut map, &LayoutConfig::default());
        (map, a, b)
    }

    #[test]
    fn connectors_anchor_on_box_edges() {
        let (map, a, b) = laid_out();
        let edges = connectors(&map);
        assert_eq!(edges.len(), 2);

        let root = map.root();
        let na = map.get(a).unwrap();
        assert_eq!(edges[0].from, root.id);
        assert_eq!(edges[0].to, a);
        assert_eq!(edges[0].start, (root.x + root.width / 2.0, root.y));
        assert_eq!(edges[0].end, (na.x - na.width / 2.0, na.y));
        assert_eq!(edges[1].to, b);
    }

    #[test]
    fn collapsed_subtree_has_no_boxes_or_edges() {
        let (mut map, a, _) = laid_out();
        map.toggle_collapse(a).unwrap();
        assert_eq!(render_boxes(&map).len(), 2);
        assert_eq!(connectors(&map).len(), 1);
    }

    #[test]
    fn export_bounds_cover_visible_boxes_plus_padding() {
        let (map, _, b) = laid_out();
        let bounds = export_bounds(&map, DEFAULT_EXPORT_PADDING);
        let root = map.root();
        let nb = map.get(b).unwrap();

        assert_eq!(bounds.min_x, root.x - root.width / 2.0);
        assert_eq!(bounds.max_x, nb.x + nb.width / 2.0);
        assert_eq!(bounds.x, bounds.min_x - 100.0);
        assert_eq!(bounds.width, bounds.max_x - bounds.min_x + 200.0);
        assert_eq!(bounds.height, bounds.max_y - bounds.min_y + 200.0);
    }

    #[test]
    fn hit_test_finds_node_and_misses_background() {
        let (map, a, _) = laid_out();
        let na = map.get(a).unwrap();
        assert_eq!(hit_test(&map, na.x + 1.0, na.y - 1.0), Some(a));
        assert_eq!(hit_test(&map, -10_000.0, 0.0), None);
    }
}
