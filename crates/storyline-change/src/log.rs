//! Undo/redo log
//!
//! Linear stack of applied records plus a stack of undone ones. Applying a
//! new record discards whatever was undone.

use crate::change::{ApplyChange, RevertChange, StoryChange};
use crate::error::ChangeError;
use storyline_domain::Story;

/// Ordered log of changes made to one story during an editing session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoRedoLog {
    /// Applied records, oldest first
    applied: Vec<StoryChange>,
    /// Undone records, most recently undone last
    undone: Vec<StoryChange>,
}

impl UndoRedoLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `change` to `story` and record it
    ///
    /// Clears the redo stack.
    ///
    /// # Errors
    /// Returns error if the change cannot be applied; nothing is recorded
    /// and the redo stack is kept in that case
    pub fn apply_change(
        &mut self,
        change: impl Into<StoryChange>,
        story: &mut Story,
    ) -> Result<(), ChangeError> {
        let change = change.into();
        change.apply_to(story)?;
        tracing::debug!(
            "Recorded {} (node: {:?})",
            change.command(),
            change.node_id().map(|id| id.to_string())
        );
        self.applied.push(change);
        self.undone.clear();
        Ok(())
    }

    /// Revert the most recent record on `story`
    ///
    /// # Errors
    /// - [`ChangeError::NothingToUndo`] if the log is empty
    /// - [`ChangeError::NotUndoable`] if the latest record is irreversible
    ///
    /// The log and the story are unchanged on error.
    pub fn undo_change(&mut self, story: &mut Story) -> Result<StoryChange, ChangeError> {
        let change = match self.applied.last() {
            None => return Err(ChangeError::NothingToUndo),
            Some(StoryChange::Irreversible(change)) => {
                tracing::warn!("Refusing to undo {}", change.command());
                return Err(ChangeError::NotUndoable {
                    command: change.command(),
                    reason: change.reason(),
                });
            }
            Some(StoryChange::Reversible(change)) => change,
        };

        change.revert_on(story)?;
        tracing::info!("Undid {}", change.command());

        let Some(change) = self.applied.pop() else {
            return Err(ChangeError::NothingToUndo);
        };
        self.undone.push(change.clone());
        Ok(change)
    }

    /// Re-apply the most recently undone record on `story`
    ///
    /// # Errors
    /// - [`ChangeError::NothingToRedo`] if nothing was undone
    /// - any application error; the record stays on the redo stack
    pub fn redo_change(&mut self, story: &mut Story) -> Result<StoryChange, ChangeError> {
        let change = self.undone.last().ok_or(ChangeError::NothingToRedo)?;
        change.apply_to(story)?;
        tracing::info!("Redid {}", change.command());

        let Some(change) = self.undone.pop() else {
            return Err(ChangeError::NothingToRedo);
        };
        self.applied.push(change.clone());
        Ok(change)
    }

    /// Applied records in order, for backend submission
    #[inline]
    #[must_use]
    pub fn committable_change_list(&self) -> &[StoryChange] {
        &self.applied
    }

    /// Applied records as the backend's JSON array
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn committable_change_list_json(&self) -> Result<serde_json::Value, ChangeError> {
        Ok(serde_json::to_value(&self.applied)?)
    }

    /// Number of applied records
    #[inline]
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.applied.len()
    }

    /// Check if any record awaits submission
    #[inline]
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Check if the latest record exists and can be reverted
    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.applied.last().is_some_and(StoryChange::is_reversible)
    }

    /// Check if an undone record can be re-applied
    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Forget every record, typically after the backend accepted them
    pub fn clear_changes(&mut self) {
        tracing::info!("Clearing {} recorded changes", self.applied.len());
        self.applied.clear();
        self.undone.clear();
    }
}
