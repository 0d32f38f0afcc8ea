//! Spatial navigation between nodes.
//!
//! Arrow-key movement picks the nearest node in a cardinal direction that
//! is roughly aligned with the current one. Only visible nodes are
//! candidates: anything under a collapsed ancestor carries stale geometry
//! and is skipped.

use crate::id::NodeId;
use crate::model::MindMap;

/// Cross-axis tolerance used when none is configured.
pub const DEFAULT_ALIGN_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Split the offset `(dx, dy)` from the origin node into
    /// `(along, cross)`; `along > 0` means "on the requested side".
    fn project(self, dx: f32, dy: f32) -> (f32, f32) {
        match self {
            Direction::Up => (-dy, dx),
            Direction::Down => (dy, dx),
            Direction::Left => (-dx, dy),
            Direction::Right => (dx, dy),
        }
    }
}

/// Find the nearest visible node from `from` in `direction`.
///
/// A candidate qualifies when its cross-axis offset is below `threshold`
/// and it lies strictly on the requested side. The smallest along-axis
/// distance wins; ties go to the smaller cross-axis offset, then to the
/// earlier node in pre-order. Returns `None` when nothing qualifies or
/// `from` is not in the tree.
pub fn find_nearest(
    map: &MindMap,
    from: NodeId,
    direction: Direction,
    threshold: f32,
) -> Option<NodeId> {
    let origin = map.get(from)?;
    let mut best: Option<(f32, f32, NodeId)> = None;

    for idx in map.preorder(true) {
        let node = map.node(idx);
        if node.id == from {
            continue;
        }
        let (along, cross) = direction.project(node.x - origin.x, node.y - origin.y);
        let cross = cross.abs();
        if along <= 0.0 || cross >= threshold {
            continue;
        }
        let closer = match best {
            None => true,
            Some((best_along, best_cross, _)) => {
                along < best_along || (along == best_along && cross < best_cross)
            }
        };
        if closer {
            best = Some((along, cross, node.id));
        }
    }

    best.map(|(.., id)| id)
}
