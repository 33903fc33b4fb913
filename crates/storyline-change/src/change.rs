//! Change records
//!
//! A [`StoryChange`] describes one mutation in the backend's wire schema.
//! Reversible and irreversible records are distinct types: only
//! [`ReversibleChange`] implements [`RevertChange`], so there is no way to
//! write the inverse of a node deletion.

use crate::error::ChangeError;
use crate::property::{ContentsProperty, NodeProperty, PropertyValue, StoryProperty};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use storyline_domain::{NodeId, Story};

/// Command string of `update_story_property`
pub const CMD_UPDATE_STORY_PROPERTY: &str = "update_story_property";
/// Command string of `update_story_node_property`
pub const CMD_UPDATE_STORY_NODE_PROPERTY: &str = "update_story_node_property";
/// Command string of `update_story_node_outline_status`
pub const CMD_UPDATE_STORY_NODE_OUTLINE_STATUS: &str = "update_story_node_outline_status";
/// Command string of `update_story_contents_property`
pub const CMD_UPDATE_STORY_CONTENTS_PROPERTY: &str = "update_story_contents_property";
/// Command string of `add_story_node`
pub const CMD_ADD_STORY_NODE: &str = "add_story_node";
/// Command string of `delete_story_node`
pub const CMD_DELETE_STORY_NODE: &str = "delete_story_node";

const REVERSIBLE_COMMANDS: &[&str] = &[
    CMD_UPDATE_STORY_PROPERTY,
    CMD_UPDATE_STORY_NODE_PROPERTY,
    CMD_UPDATE_STORY_NODE_OUTLINE_STATUS,
    CMD_UPDATE_STORY_CONTENTS_PROPERTY,
    CMD_ADD_STORY_NODE,
];

const COMMANDS: &[&str] = &[
    CMD_UPDATE_STORY_PROPERTY,
    CMD_UPDATE_STORY_NODE_PROPERTY,
    CMD_UPDATE_STORY_NODE_OUTLINE_STATUS,
    CMD_UPDATE_STORY_CONTENTS_PROPERTY,
    CMD_ADD_STORY_NODE,
    CMD_DELETE_STORY_NODE,
];

/// Forward application of a record
pub trait ApplyChange {
    /// Apply the record's new state to `story`
    ///
    /// # Errors
    /// Returns error if the record does not fit the story; the story is
    /// unchanged in that case
    fn apply_to(&self, story: &mut Story) -> Result<(), ChangeError>;

    /// Backend command string
    fn command(&self) -> &'static str;
}

/// Inverse application of a record
pub trait RevertChange: ApplyChange {
    /// Restore the record's old state on `story`
    ///
    /// # Errors
    /// Returns error if the record does not fit the story; the story is
    /// unchanged in that case
    fn revert_on(&self, story: &mut Story) -> Result<(), ChangeError>;
}

/// Records that carry enough state to be undone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ReversibleChange {
    /// Story-level scalar property
    UpdateStoryProperty {
        property_name: StoryProperty,
        old_value: PropertyValue,
        new_value: PropertyValue,
    },

    /// Node-level scalar or id-set property
    UpdateStoryNodeProperty {
        node_id: NodeId,
        property_name: NodeProperty,
        old_value: PropertyValue,
        new_value: PropertyValue,
    },

    /// Outline finalized flag
    UpdateStoryNodeOutlineStatus {
        node_id: NodeId,
        old_value: bool,
        new_value: bool,
    },

    /// Contents-level property
    UpdateStoryContentsProperty {
        property_name: ContentsProperty,
        old_value: Option<NodeId>,
        new_value: Option<NodeId>,
    },

    /// Node creation under a freshly minted id
    AddStoryNode { node_id: NodeId, title: String },
}

impl ReversibleChange {
    fn write(&self, story: &mut Story, forward: bool) -> Result<(), ChangeError> {
        match self {
            Self::UpdateStoryProperty {
                property_name,
                old_value,
                new_value,
            } => {
                let value = if forward { new_value } else { old_value };
                property_name.write(story, value)
            }
            Self::UpdateStoryNodeProperty {
                node_id,
                property_name,
                old_value,
                new_value,
            } => {
                let value = if forward { new_value } else { old_value };
                let node = story.contents_mut().node_mut(*node_id)?;
                property_name.write(node, value)
            }
            Self::UpdateStoryNodeOutlineStatus {
                node_id,
                old_value,
                new_value,
            } => {
                let value = if forward { *new_value } else { *old_value };
                story
                    .contents_mut()
                    .node_mut(*node_id)?
                    .set_outline_status(value);
                Ok(())
            }
            Self::UpdateStoryContentsProperty {
                property_name: ContentsProperty::InitialNodeId,
                old_value,
                new_value,
            } => {
                let value = if forward { *new_value } else { *old_value };
                story.contents_mut().set_initial_node_id(value)?;
                Ok(())
            }
            Self::AddStoryNode { node_id, title } => {
                if forward {
                    story.contents_mut().add_node_with_id(*node_id, title.clone())?;
                } else {
                    story.contents_mut().delete_node(*node_id)?;
                }
                Ok(())
            }
        }
    }

    /// Node the record targets, if any
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::UpdateStoryNodeProperty { node_id, .. }
            | Self::UpdateStoryNodeOutlineStatus { node_id, .. }
            | Self::AddStoryNode { node_id, .. } => Some(*node_id),
            Self::UpdateStoryProperty { .. } | Self::UpdateStoryContentsProperty { .. } => None,
        }
    }
}

impl ApplyChange for ReversibleChange {
    fn apply_to(&self, story: &mut Story) -> Result<(), ChangeError> {
        self.write(story, true)
    }

    fn command(&self) -> &'static str {
        match self {
            Self::UpdateStoryProperty { .. } => CMD_UPDATE_STORY_PROPERTY,
            Self::UpdateStoryNodeProperty { .. } => CMD_UPDATE_STORY_NODE_PROPERTY,
            Self::UpdateStoryNodeOutlineStatus { .. } => CMD_UPDATE_STORY_NODE_OUTLINE_STATUS,
            Self::UpdateStoryContentsProperty { .. } => CMD_UPDATE_STORY_CONTENTS_PROPERTY,
            Self::AddStoryNode { .. } => CMD_ADD_STORY_NODE,
        }
    }
}

impl RevertChange for ReversibleChange {
    fn revert_on(&self, story: &mut Story) -> Result<(), ChangeError> {
        self.write(story, false)
    }
}

/// Records that cannot be undone
///
/// A deletion keeps no copy of the deleted node, so there is nothing to
/// restore it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum IrreversibleChange {
    /// Node removal
    DeleteStoryNode { node_id: NodeId },
}

impl IrreversibleChange {
    /// Why the record cannot be undone
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::DeleteStoryNode { .. } => "A deleted story node cannot be restored.",
        }
    }

    /// Node the record targets
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::DeleteStoryNode { node_id } => *node_id,
        }
    }
}

impl ApplyChange for IrreversibleChange {
    fn apply_to(&self, story: &mut Story) -> Result<(), ChangeError> {
        match self {
            Self::DeleteStoryNode { node_id } => {
                story.contents_mut().delete_node(*node_id)?;
                Ok(())
            }
        }
    }

    fn command(&self) -> &'static str {
        match self {
            Self::DeleteStoryNode { .. } => CMD_DELETE_STORY_NODE,
        }
    }
}

/// Any change record, serialized flat with its `cmd` tag
///
/// Deserialization reads `cmd` first, so an unknown command is reported by
/// name rather than as a shape mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StoryChange {
    /// Undoable record
    Reversible(ReversibleChange),
    /// Record with no inverse
    Irreversible(IrreversibleChange),
}

impl StoryChange {
    /// Check if record can be undone
    #[inline]
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Reversible(_))
    }

    /// Node the record targets, if any
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Reversible(change) => change.node_id(),
            Self::Irreversible(change) => Some(change.node_id()),
        }
    }

    /// Backend dict for this record
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_backend_dict(&self) -> Result<serde_json::Value, ChangeError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<'de> Deserialize<'de> for StoryChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let cmd = match value.get("cmd") {
            Some(serde_json::Value::String(cmd)) => cmd.clone(),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "change record 'cmd' must be a string, got {other}"
                )))
            }
            None => return Err(de::Error::missing_field("cmd")),
        };

        if REVERSIBLE_COMMANDS.contains(&cmd.as_str()) {
            ReversibleChange::deserialize(value)
                .map(Self::Reversible)
                .map_err(|e| de::Error::custom(format!("invalid {cmd} record: {e}")))
        } else if cmd == CMD_DELETE_STORY_NODE {
            IrreversibleChange::deserialize(value)
                .map(Self::Irreversible)
                .map_err(|e| de::Error::custom(format!("invalid {cmd} record: {e}")))
        } else {
            Err(de::Error::unknown_variant(&cmd, COMMANDS))
        }
    }
}

impl ApplyChange for StoryChange {
    fn apply_to(&self, story: &mut Story) -> Result<(), ChangeError> {
        match self {
            Self::Reversible(change) => change.apply_to(story),
            Self::Irreversible(change) => change.apply_to(story),
        }
    }

    fn command(&self) -> &'static str {
        match self {
            Self::Reversible(change) => change.command(),
            Self::Irreversible(change) => change.command(),
        }
    }
}

impl From<ReversibleChange> for StoryChange {
    fn from(change: ReversibleChange) -> Self {
        Self::Reversible(change)
    }
}

impl From<IrreversibleChange> for StoryChange {
    fn from(change: IrreversibleChange) -> Self {
        Self::Irreversible(change)
    }
}
