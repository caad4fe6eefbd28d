//! Layout error types.
//!
//! Sizing itself is total; these errors only surface from tree validation
//! and configuration loading.

use thiserror::Error;

use crate::layout::tree::NodeId;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("cycle in view tree: {node} is its own ancestor (reached again from {ancestor})")]
    Cycle { node: NodeId, ancestor: NodeId },

    #[error("view tree nesting depth {depth} exceeds limit {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
