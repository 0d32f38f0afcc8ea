//! Horizontal tree layout.
//!
//! Places the visible tree left to right: `x` is proportional to depth,
//! siblings stack vertically in child order, and every parent sits midway
//! between its first and last visible child. The whole tree is then
//! recentered on `y = 0`.
//!
//! The pass is a full recompute over the visible tree; there is no
//! incremental mode. It walks with an explicit stack so arbitrarily deep
//! trees cannot overflow the call stack.

use crate::error::{MindMapError, Result};
use crate::model::{Color, MindMap};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Spacing parameters for `auto_layout`, plus the canvas background that
/// travels with them in documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Horizontal distance between depth levels.
    pub level_width: f32,
    /// Vertical slot each leaf occupies.
    pub node_height: f32,
    pub background_color: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_width: 200.0,
            node_height: 60.0,
            background_color: Color::rgb8(0xF5, 0xF5, 0xF5),
        }
    }
}

/// Partial `LayoutConfig` update. Absent fields keep their prior value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
}

impl LayoutConfigPatch {
    /// Reject non-positive or non-finite spacing.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("levelWidth", self.level_width),
            ("nodeHeight", self.node_height),
        ] {
            if let Some(v) = value
                && !(v.is_finite() && v > 0.0)
            {
                return Err(MindMapError::InvalidData(format!(
                    "`{name}` must be a positive number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Apply to `config`. Validates first; on error `config` is untouched.
    pub fn apply_to(&self, config: &mut LayoutConfig) -> Result<()> {
        self.validate()?;
        if let Some(w) = self.level_width {
            config.level_width = w;
        }
        if let Some(h) = self.node_height {
            config.node_height = h;
        }
        if let Some(c) = self.background_color {
            config.background_color = c;
        }
        Ok(())
    }
}

impl From<&LayoutConfig> for LayoutConfigPatch {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            level_width: Some(config.level_width),
            node_height: Some(config.node_height),
            background_color: Some(config.background_color),
        }
    }
}

/// One node on the explicit post-order stack.
struct Frame {
    idx: NodeIndex,
    next_child: usize,
    first_child_y: Option<f32>,
    last_child_y: f32,
}

impl Frame {
    fn new(idx: NodeIndex) -> Self {
        Self {
            idx,
            next_child: 0,
            first_child_y: None,
            last_child_y: 0.0,
        }
    }
}

/// Size and position every visible node, then recenter the tree vertically.
///
/// Nodes under a collapsed ancestor keep their previous geometry apart from
/// the final recentering shift.
pub fn auto_layout(map: &mut MindMap, config: &LayoutConfig) {
    let mut cursor = 0.0f32;
    let mut stack = vec![Frame::new(map.root_index())];

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = map.visible_children(frame.idx).get(frame.next_child) {
            frame.next_child += 1;
            stack.push(Frame::new(child));
            continue;
        }

        let Some(frame) = stack.pop() else { break };
        let node = map.node_mut(frame.idx);
        node.calculate_size();
        node.x = node.level as f32 * config.level_width;
        node.y = match frame.first_child_y {
            Some(first) => (first + frame.last_child_y) / 2.0,
            None => {
                let y = cursor;
                cursor += config.node_height;
                y
            }
        };

        let y = node.y;
        if let Some(parent) = stack.last_mut() {
            parent.first_child_y.get_or_insert(y);
            parent.last_child_y = y;
        }
    }

    recenter(map);
    log::trace!("auto layout placed {} nodes", map.node_count());
}

/// Shift every node so `min(y) + max(y) == 0`.
fn recenter(map: &mut MindMap) {
    let (min_y, max_y) = map
        .nodes()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), n| {
            (lo.min(n.y), hi.max(n.y))
        });
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }
    let offset = -(min_y + max_y) / 2.0;
    map.for_each_node_mut(|n| n.y += offset);
}
