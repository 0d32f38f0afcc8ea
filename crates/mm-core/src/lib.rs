pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;
pub mod navigate;
pub mod viewport;

pub use document::{
    DEFAULT_MAX_DEPTH, DOCUMENT_VERSION, Document, NodeRecord, export_snapshot, import_snapshot,
};
pub use error::{MindMapError, Result};
pub use geometry::{
    Connector, DEFAULT_EXPORT_PADDING, ExportBounds, NodeBox, connectors, export_bounds, hit_test,
    render_boxes,
};
pub use id::NodeId;
pub use layout::{LayoutConfig, LayoutConfigPatch, auto_layout};
pub use model::*;
pub use navigate::{DEFAULT_ALIGN_THRESHOLD, Direction, find_nearest};
pub use viewport::{CanvasView, ViewLimits};
