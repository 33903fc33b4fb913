//! Error types for the story domain object
//!
//! Only structurally impossible states are rejected here. Domain rules
//! (reference checks, exploration uniqueness, initial-node protection) live
//! in the change-tracking layer.

use crate::node::IdSet;
use crate::node_id::{NodeId, NodeIdError};

/// Errors raised by story, contents and node mutators
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// Malformed node id
    #[error("invalid node id: {0}")]
    InvalidNodeId(#[from] NodeIdError),

    /// A node with this id is already present
    #[error("a node with id {0} already exists in the story")]
    DuplicateNode(NodeId),

    /// No node with this id
    #[error("The node with given id doesn't exist: {0}")]
    NodeNotFound(NodeId),

    /// Value already present in one of a node's id sets
    #[error("'{value}' is already part of the {set} of {node_id}")]
    DuplicateEntry {
        node_id: NodeId,
        set: IdSet,
        value: String,
    },

    /// Value absent from one of a node's id sets
    #[error("'{value}' is not part of the {set} of {node_id}")]
    MissingEntry {
        node_id: NodeId,
        set: IdSet,
        value: String,
    },

    /// Counter cannot advance past `node_id`
    #[error("no node id can be minted after {0}")]
    IdSpaceExhausted(NodeId),

    /// Snapshot breaks a hard invariant
    #[error("story invariant violated: {0}")]
    InvariantViolation(String),

    /// Snapshot (de)serialization failed
    #[error("story snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoryError {
    /// Check if error is about a node that does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_))
    }
}
