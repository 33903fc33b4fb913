//! Editing session
//!
//! Owns one story together with the service that edits it, for the length
//! of one editing session.

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::service::StoryUpdateService;
use storyline_change::{ChangeError, StoryChange};
use storyline_domain::Story;

/// One story being edited
#[derive(Debug, Clone)]
pub struct EditorSession {
    story: Story,
    service: StoryUpdateService,
}

impl EditorSession {
    /// Start a session on an already loaded story
    ///
    /// # Errors
    /// Returns [`EditorError::Story`] if snapshot validation is enabled and
    /// the story breaks a hard invariant
    pub fn new(story: Story, config: EditorConfig) -> Result<Self, EditorError> {
        if config.validate_snapshots {
            story.check_invariants()?;
        }
        tracing::info!("Opened story {} at version {}", story.id(), story.version());
        Ok(Self {
            story,
            service: StoryUpdateService::with_config(config),
        })
    }

    /// Start a session from a backend snapshot
    ///
    /// # Errors
    /// Returns [`EditorError::Story`] on malformed JSON or, with snapshot
    /// validation enabled, on a broken invariant
    pub fn from_json(json: &str, config: EditorConfig) -> Result<Self, EditorError> {
        Self::new(Story::from_json(json)?, config)
    }

    #[inline]
    #[must_use]
    pub fn story(&self) -> &Story {
        &self.story
    }

    #[inline]
    #[must_use]
    pub fn service(&self) -> &StoryUpdateService {
        &self.service
    }

    /// Run one or more service operations against the owned story
    ///
    /// # Errors
    /// Returns whatever the operations return, wrapped in [`EditorError::Change`]
    ///
    /// # Example
    ///
    /// ```rust
    /// use storyline_domain::Story;
    /// use storyline_editor::{EditorConfig, EditorSession};
    ///
    /// let story = Story::new("story_1", "Draft", "topic_1");
    /// let mut session = EditorSession::new(story, EditorConfig::default())?;
    ///
    /// let first = session.edit(|service, story| service.add_story_node(story, "Halves"))?;
    /// assert_eq!(first.to_string(), "node_1");
    /// assert_eq!(session.service().log().change_count(), 1);
    /// # Ok::<(), storyline_editor::EditorError>(())
    /// ```
    pub fn edit<R>(
        &mut self,
        op: impl FnOnce(&mut StoryUpdateService, &mut Story) -> Result<R, ChangeError>,
    ) -> Result<R, EditorError> {
        Ok(op(&mut self.service, &mut self.story)?)
    }

    /// # Errors
    /// See [`StoryUpdateService::undo`]
    pub fn undo(&mut self) -> Result<StoryChange, EditorError> {
        Ok(self.service.undo(&mut self.story)?)
    }

    /// # Errors
    /// See [`StoryUpdateService::redo`]
    pub fn redo(&mut self) -> Result<StoryChange, EditorError> {
        Ok(self.service.redo(&mut self.story)?)
    }

    /// Recorded changes as the backend's JSON array
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn committable_change_list_json(&self) -> Result<serde_json::Value, EditorError> {
        Ok(self.service.log().committable_change_list_json()?)
    }

    /// Drop recorded changes once the backend has accepted them
    pub fn mark_saved(&mut self) {
        self.service.clear_changes();
    }

    /// Issues that block publishing the story
    #[must_use]
    pub fn prepublish_issues(&self) -> Vec<String> {
        self.story.validate()
    }

    /// End the session, returning the edited story
    #[must_use]
    pub fn into_story(self) -> Story {
        self.story
    }
}
