//! Error taxonomy shared by every fallible mind-map operation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MindMapError {
    /// A structurally illegal request: deleting the root, adding a sibling
    /// to the root, or addressing a node that is not part of the tree.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A malformed document: missing fields, duplicate ids, excessive depth,
    /// out-of-range numbers.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, MindMapError>;

impl MindMapError {
    pub fn unknown_node(id: impl std::fmt::Display) -> Self {
        Self::InvalidOperation(format!("node `{id}` is not part of the tree"))
    }
}
