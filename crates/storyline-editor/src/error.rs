//! Error types for the editor

use storyline_change::ChangeError;
use storyline_domain::StoryError;

/// Main editor error type
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Edit rejected or undo/redo failed
    #[error("change failed: {0}")]
    Change(#[from] ChangeError),

    /// Snapshot could not be loaded or violates invariants
    #[error("story error: {0}")]
    Story(#[from] StoryError),

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl EditorError {
    /// Underlying change error, if any
    #[inline]
    #[must_use]
    pub fn as_change(&self) -> Option<&ChangeError> {
        match self {
            Self::Change(err) => Some(err),
            _ => None,
        }
    }
}
