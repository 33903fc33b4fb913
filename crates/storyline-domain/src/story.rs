//! The story aggregate
//!
//! Provides [`Story`], the root of the editable tree. It serializes to and
//! from the backend snapshot dict.

use crate::contents::StoryContents;
use crate::error::StoryError;
use serde::{Deserialize, Serialize};

/// Language assigned to freshly created stories
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Editable story
///
/// Owns its [`StoryContents`]. Holds no external resources, so dropping it
/// is the whole teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    version: u64,
    corresponding_topic_id: String,
    story_contents: StoryContents,
    language_code: String,
    #[serde(default)]
    thumbnail_filename: Option<String>,
    #[serde(default)]
    thumbnail_bg_color: Option<String>,
    #[serde(default)]
    url_fragment: String,
    #[serde(default)]
    meta_tag_content: String,
}

impl Story {
    /// Create an unsaved story with empty contents
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        corresponding_topic_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            notes: String::new(),
            version: 0,
            corresponding_topic_id: corresponding_topic_id.into(),
            story_contents: StoryContents::new(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            thumbnail_filename: None,
            thumbnail_bg_color: None,
            url_fragment: String::new(),
            meta_tag_content: String::new(),
        }
    }

    /// Parse a backend snapshot
    ///
    /// # Errors
    /// Returns error if the JSON does not match the snapshot shape
    pub fn from_json(json: &str) -> Result<Self, StoryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build from an already-parsed snapshot value
    ///
    /// # Errors
    /// Returns error if the value does not match the snapshot shape
    pub fn from_value(value: serde_json::Value) -> Result<Self, StoryError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to the backend snapshot shape
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, StoryError> {
        Ok(serde_json::to_string(self)?)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    #[inline]
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[inline]
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Backend version the snapshot was taken at
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    #[inline]
    pub fn set_language_code(&mut self, language_code: impl Into<String>) {
        self.language_code = language_code.into();
    }

    #[inline]
    #[must_use]
    pub fn corresponding_topic_id(&self) -> &str {
        &self.corresponding_topic_id
    }

    #[inline]
    #[must_use]
    pub fn thumbnail_filename(&self) -> Option<&str> {
        self.thumbnail_filename.as_deref()
    }

    #[inline]
    pub fn set_thumbnail_filename(&mut self, filename: Option<String>) {
        self.thumbnail_filename = filename;
    }

    #[inline]
    #[must_use]
    pub fn thumbnail_bg_color(&self) -> Option<&str> {
        self.thumbnail_bg_color.as_deref()
    }

    #[inline]
    pub fn set_thumbnail_bg_color(&mut self, color: Option<String>) {
        self.thumbnail_bg_color = color;
    }

    #[inline]
    #[must_use]
    pub fn url_fragment(&self) -> &str {
        &self.url_fragment
    }

    #[inline]
    pub fn set_url_fragment(&mut self, url_fragment: impl Into<String>) {
        self.url_fragment = url_fragment.into();
    }

    #[inline]
    #[must_use]
    pub fn meta_tag_content(&self) -> &str {
        &self.meta_tag_content
    }

    #[inline]
    pub fn set_meta_tag_content(&mut self, content: impl Into<String>) {
        self.meta_tag_content = content.into();
    }

    #[inline]
    #[must_use]
    pub fn contents(&self) -> &StoryContents {
        &self.story_contents
    }

    #[inline]
    pub fn contents_mut(&mut self) -> &mut StoryContents {
        &mut self.story_contents
    }

    /// Verify the hard invariants of the whole story
    ///
    /// # Errors
    /// Returns the first violation found
    pub fn check_invariants(&self) -> Result<(), StoryError> {
        self.story_contents.check_invariants()
    }

    /// Issues that block publishing but not editing
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.title.trim().is_empty() {
            issues.push("Story title should not be empty".to_string());
        }
        issues.extend(self.story_contents.validate());
        issues
    }
}
