//! Serialized document format.
//!
//! A document nests every node inside its parent's `children` array and
//! carries no parent pointers, so it is acyclic and JSON-safe. Import
//! rebuilds the arena top-down, re-deriving parents from nesting and levels
//! from depth. Validation runs to completion before anything is built, so a
//! rejected document never leaves a half-built tree behind.

use crate::error::{MindMapError, Result};
use crate::id::NodeId;
use crate::layout::{LayoutConfig, LayoutConfigPatch};
use crate::model::{MindMap, MindNode, NodeStyle};
use crate::viewport::CanvasView;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Format version written by `export_snapshot`.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Nesting limit enforced on import.
///
/// serde_json refuses input nested deeper than 128 containers and each
/// tree level costs two (the node object and its `children` array), so
/// JSON documents cannot go much deeper than this anyway.
pub const DEFAULT_MAX_DEPTH: usize = 60;

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// One node and, recursively, its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub text: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    pub style: NodeStyle,
    #[serde(default)]
    pub children: Vec<NodeRecord>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub level: u32,
}

/// A whole mind-map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: String,
    pub nodes: NodeRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_config: Option<LayoutConfigPatch>,
}

impl Document {
    /// Parse a JSON document. Malformed JSON and missing required fields
    /// are reported as `InvalidData`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| MindMapError::InvalidData(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MindMapError::InvalidData(e.to_string()))
    }
}

fn record_of(node: &MindNode, children: Vec<NodeRecord>) -> NodeRecord {
    NodeRecord {
        id: node.id,
        text: node.text.clone(),
        x: node.x,
        y: node.y,
        width: node.width,
        height: node.height,
        style: node.style.clone(),
        children,
        collapsed: node.collapsed,
        level: node.level,
    }
}

/// Serialize the whole tree (hidden nodes included) with the view and
/// layout settings.
pub fn export_snapshot(map: &MindMap, view: &CanvasView, config: &LayoutConfig) -> Document {
    // Build bottom-up over reversed pre-order so children exist before
    // their parent claims them.
    let mut built: HashMap<NodeIndex, NodeRecord> = HashMap::new();
    for idx in map.preorder(false).into_iter().rev() {
        let children = map
            .children(idx)
            .iter()
            .filter_map(|c| built.remove(c))
            .collect();
        built.insert(idx, record_of(map.node(idx), children));
    }
    let nodes = built
        .remove(&map.root_index())
        .unwrap_or_else(|| record_of(map.root(), Vec::new()));

    Document {
        version: DOCUMENT_VERSION.to_string(),
        nodes,
        canvas: Some(*view),
        canvas_config: Some(LayoutConfigPatch::from(config)),
    }
}

fn invalid(msg: String) -> MindMapError {
    MindMapError::InvalidData(msg)
}

fn check_number(id: NodeId, field: &str, v: f32, allow_zero: bool) -> Result<()> {
    let ok = v.is_finite() && if allow_zero { v >= 0.0 } else { v > 0.0 };
    if ok {
        Ok(())
    } else {
        Err(invalid(format!("node `{id}`: `{field}` out of range ({v})")))
    }
}

/// Check one record's own fields (not its children).
fn validate_record(record: &NodeRecord) -> Result<()> {
    let id = record.id;
    if id.as_str().is_empty() {
        return Err(invalid("node with an empty id".into()));
    }
    if !(record.x.is_finite() && record.y.is_finite()) {
        return Err(invalid(format!("node `{id}`: position is not finite")));
    }
    check_number(id, "width", record.width, true)?;
    check_number(id, "height", record.height, true)?;
    check_number(id, "fontSize", record.style.font_size, false)?;
    check_number(id, "padding", record.style.padding, true)?;
    check_number(id, "borderWidth", record.style.border_width, true)?;
    check_number(id, "borderRadius", record.style.border_radius, true)?;
    Ok(())
}

/// Validate the whole nested structure: unique ids, bounded depth, sane
/// numbers. Iterative, so hostile nesting cannot blow the stack here.
fn validate(root: &NodeRecord, max_depth: usize) -> Result<()> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<(&NodeRecord, usize)> = vec![(root, 0)];
    while let Some((record, depth)) = stack.pop() {
        if depth > max_depth {
            return Err(invalid(format!(
                "tree deeper than the allowed {max_depth} levels"
            )));
        }
        validate_record(record)?;
        if !seen.insert(record.id) {
            return Err(invalid(format!(
                "node `{}` appears more than once",
                record.id
            )));
        }
        stack.extend(record.children.iter().map(|c| (c, depth + 1)));
    }
    Ok(())
}

fn node_from_record(record: &NodeRecord, level: u32) -> MindNode {
    if record.level != level {
        log::warn!(
            "node `{}` stored level {} but sits at depth {level}; using {level}",
            record.id,
            record.level
        );
    }
    // Stored sizes are only a cache; recompute them from text and style.
    let mut node = MindNode {
        id: record.id,
        text: record.text.clone(),
        x: record.x,
        y: record.y,
        width: 0.0,
        height: 0.0,
        style: record.style.clone(),
        collapsed: record.collapsed,
        level,
    };
    node.calculate_size();
    node
}

/// Rebuild a live tree from a document's node records.
///
/// Parents are assigned top-down from nesting, levels from depth and sizes
/// from each node's text and style. Fails with `InvalidData` if the records
/// do not form a valid single-rooted tree within `max_depth`; nothing is
/// built in that case.
pub fn import_snapshot(doc: &Document, max_depth: usize) -> Result<MindMap> {
    validate(&doc.nodes, max_depth)?;
    if doc.version != DOCUMENT_VERSION {
        log::warn!(
            "document version `{}` differs from `{DOCUMENT_VERSION}`",
            doc.version
        );
    }

    let mut map = MindMap::with_root(node_from_record(&doc.nodes, 0));
    let mut stack: Vec<(&NodeRecord, NodeIndex, u32)> = doc
        .nodes
        .children
        .iter()
        .rev()
        .map(|c| (c, map.root_index(), 1))
        .collect();
    while let Some((record, parent, level)) = stack.pop() {
        let idx = map.attach(parent, node_from_record(record, level));
        stack.extend(record.children.iter().rev().map(|c| (c, idx, level + 1)));
    }

    map.check_invariants()?;
    log::debug!("imported document with {} nodes", map.node_count());
    Ok(map)
}
