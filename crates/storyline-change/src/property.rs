//! Editable properties and their wire values
//!
//! Each property knows its backend name, how to read its current value off
//! the domain object and how to write a recorded value back.

use crate::error::ChangeError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use storyline_domain::{IdSet, Story, StoryNode};

/// Value carried by `old_value` / `new_value`
///
/// Serialized untagged, so it is exactly the JSON the backend expects:
/// `null`, a string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Cleared nullable property
    Null,
    /// Text property
    Text(String),
    /// Ordered id set snapshot
    List(Vec<String>),
}

impl PropertyValue {
    /// Wrap a nullable text value
    #[inline]
    #[must_use]
    pub fn from_optional(value: Option<&str>) -> Self {
        value.map_or(Self::Null, |v| Self::Text(v.to_string()))
    }

    /// Shape name, for diagnostics
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Option<String>> for PropertyValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

fn text<'a>(property: &'static str, value: &'a PropertyValue) -> Result<&'a str, ChangeError> {
    match value {
        PropertyValue::Text(s) => Ok(s),
        other => Err(ChangeError::ValueMismatch {
            property,
            expected: "text",
            actual: other.kind(),
        }),
    }
}

fn nullable_text(
    property: &'static str,
    value: &PropertyValue,
) -> Result<Option<String>, ChangeError> {
    match value {
        PropertyValue::Null => Ok(None),
        PropertyValue::Text(s) => Ok(Some(s.clone())),
        other @ PropertyValue::List(_) => Err(ChangeError::ValueMismatch {
            property,
            expected: "text or null",
            actual: other.kind(),
        }),
    }
}

fn list<'a>(property: &'static str, value: &'a PropertyValue) -> Result<&'a [String], ChangeError> {
    match value {
        PropertyValue::List(items) => Ok(items),
        other => Err(ChangeError::ValueMismatch {
            property,
            expected: "list",
            actual: other.kind(),
        }),
    }
}

/// Story-level properties (`update_story_property`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryProperty {
    Title,
    Description,
    Notes,
    LanguageCode,
    ThumbnailFilename,
    ThumbnailBgColor,
    UrlFragment,
    MetaTagContent,
}

impl StoryProperty {
    /// Backend property name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Notes => "notes",
            Self::LanguageCode => "language_code",
            Self::ThumbnailFilename => "thumbnail_filename",
            Self::ThumbnailBgColor => "thumbnail_bg_color",
            Self::UrlFragment => "url_fragment",
            Self::MetaTagContent => "meta_tag_content",
        }
    }

    /// Current value on `story`
    #[must_use]
    pub fn read(&self, story: &Story) -> PropertyValue {
        match self {
            Self::Title => story.title().into(),
            Self::Description => story.description().into(),
            Self::Notes => story.notes().into(),
            Self::LanguageCode => story.language_code().into(),
            Self::ThumbnailFilename => PropertyValue::from_optional(story.thumbnail_filename()),
            Self::ThumbnailBgColor => PropertyValue::from_optional(story.thumbnail_bg_color()),
            Self::UrlFragment => story.url_fragment().into(),
            Self::MetaTagContent => story.meta_tag_content().into(),
        }
    }

    /// Write `value` onto `story`
    ///
    /// # Errors
    /// Returns [`ChangeError::ValueMismatch`] if `value` has the wrong shape;
    /// the story is unchanged in that case
    pub fn write(&self, story: &mut Story, value: &PropertyValue) -> Result<(), ChangeError> {
        let name = self.name();
        match self {
            Self::Title => story.set_title(text(name, value)?),
            Self::Description => story.set_description(text(name, value)?),
            Self::Notes => story.set_notes(text(name, value)?),
            Self::LanguageCode => story.set_language_code(text(name, value)?),
            Self::ThumbnailFilename => story.set_thumbnail_filename(nullable_text(name, value)?),
            Self::ThumbnailBgColor => story.set_thumbnail_bg_color(nullable_text(name, value)?),
            Self::UrlFragment => story.set_url_fragment(text(name, value)?),
            Self::MetaTagContent => story.set_meta_tag_content(text(name, value)?),
        }
        Ok(())
    }
}

impl Display for StoryProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node-level properties (`update_story_node_property`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeProperty {
    Title,
    Description,
    Outline,
    ExplorationId,
    PrerequisiteSkillIds,
    AcquiredSkillIds,
    DestinationNodeIds,
    ThumbnailFilename,
    ThumbnailBgColor,
}

impl NodeProperty {
    /// Backend property name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Outline => "outline",
            Self::ExplorationId => "exploration_id",
            Self::PrerequisiteSkillIds => "prerequisite_skill_ids",
            Self::AcquiredSkillIds => "acquired_skill_ids",
            Self::DestinationNodeIds => "destination_node_ids",
            Self::ThumbnailFilename => "thumbnail_filename",
            Self::ThumbnailBgColor => "thumbnail_bg_color",
        }
    }

    /// Property backing one of a node's id sets
    #[must_use]
    pub const fn for_set(set: IdSet) -> Self {
        match set {
            IdSet::PrerequisiteSkills => Self::PrerequisiteSkillIds,
            IdSet::AcquiredSkills => Self::AcquiredSkillIds,
            IdSet::Destinations => Self::DestinationNodeIds,
        }
    }

    /// The id set this property holds, if it is a set property
    #[must_use]
    pub const fn id_set(&self) -> Option<IdSet> {
        match self {
            Self::PrerequisiteSkillIds => Some(IdSet::PrerequisiteSkills),
            Self::AcquiredSkillIds => Some(IdSet::AcquiredSkills),
            Self::DestinationNodeIds => Some(IdSet::Destinations),
            _ => None,
        }
    }

    /// Current value on `node`
    #[must_use]
    pub fn read(&self, node: &StoryNode) -> PropertyValue {
        match self {
            Self::Title => node.title().into(),
            Self::Description => node.description().into(),
            Self::Outline => node.outline().into(),
            Self::ExplorationId => PropertyValue::from_optional(node.exploration_id()),
            Self::PrerequisiteSkillIds => node.id_set(IdSet::PrerequisiteSkills).into(),
            Self::AcquiredSkillIds => node.id_set(IdSet::AcquiredSkills).into(),
            Self::DestinationNodeIds => node.id_set(IdSet::Destinations).into(),
            Self::ThumbnailFilename => PropertyValue::from_optional(node.thumbnail_filename()),
            Self::ThumbnailBgColor => PropertyValue::from_optional(node.thumbnail_bg_color()),
        }
    }

    /// Write `value` onto `node`
    ///
    /// # Errors
    /// Returns error if `value` has the wrong shape or, for id sets, holds
    /// duplicates or malformed node ids; the node is unchanged in that case
    pub fn write(&self, node: &mut StoryNode, value: &PropertyValue) -> Result<(), ChangeError> {
        let name = self.name();
        match self {
            Self::Title => node.set_title(text(name, value)?),
            Self::Description => node.set_description(text(name, value)?),
            Self::Outline => node.set_outline(text(name, value)?),
            Self::ExplorationId => node.set_exploration_id(nullable_text(name, value)?),
            Self::PrerequisiteSkillIds => {
                node.replace_set(IdSet::PrerequisiteSkills, list(name, value)?)?;
            }
            Self::AcquiredSkillIds => node.replace_set(IdSet::AcquiredSkills, list(name, value)?)?,
            Self::DestinationNodeIds => node.replace_set(IdSet::Destinations, list(name, value)?)?,
            Self::ThumbnailFilename => node.set_thumbnail_filename(nullable_text(name, value)?),
            Self::ThumbnailBgColor => node.set_thumbnail_bg_color(nullable_text(name, value)?),
        }
        Ok(())
    }
}

impl Display for NodeProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents-level properties (`update_story_contents_property`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentsProperty {
    InitialNodeId,
}

impl ContentsProperty {
    /// Backend property name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InitialNodeId => "initial_node_id",
        }
    }
}
