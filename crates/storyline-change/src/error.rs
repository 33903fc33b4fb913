//! Error types for change tracking
//!
//! Every validation failure is raised before any mutation or record is
//! produced. None of these are transient; nothing is retried.

use std::fmt::{self, Display, Formatter};
use storyline_domain::{NodeId, StoryError};

/// What a dangling node reference was meant to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    /// Target of a destination link
    Destination,
    /// Starting node of the story
    InitialNode,
}

impl Display for ReferenceRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destination => f.write_str("destination node"),
            Self::InitialNode => f.write_str("node"),
        }
    }
}

/// Change-tracking errors
#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    /// Operation references a node id that does not exist
    #[error("The {role} with given id doesn't exist: {node_id}")]
    InvalidReference { node_id: NodeId, role: ReferenceRole },

    /// Exploration already linked to another node of the story
    #[error("The given exploration already exists in the story.")]
    DuplicateReference {
        exploration_id: String,
        owner: NodeId,
    },

    /// Structural rule violated
    #[error("{0}")]
    ConstraintViolation(String),

    /// Undo attempted on an irreversible record
    #[error("{reason}")]
    NotUndoable {
        command: &'static str,
        reason: &'static str,
    },

    /// Undo on an empty log
    #[error("there is no change to undo")]
    NothingToUndo,

    /// Redo with no undone change
    #[error("there is no change to redo")]
    NothingToRedo,

    /// Recorded value has the wrong shape for its property
    #[error("value for '{property}' must be {expected}, got {actual}")]
    ValueMismatch {
        property: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Domain object rejected the mutation
    #[error(transparent)]
    Story(#[from] StoryError),

    /// Change list (de)serialization failed
    #[error("change serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChangeError {
    /// Create constraint violation error
    #[inline]
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }

    /// Check if error was raised by operation validation (as opposed to log
    /// bookkeeping or serialization)
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidReference { .. }
                | Self::DuplicateReference { .. }
                | Self::ConstraintViolation(_)
                | Self::Story(_)
        )
    }
}
