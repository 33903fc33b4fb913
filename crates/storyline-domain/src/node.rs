//! Story nodes
//!
//! A [`StoryNode`] is one chapter of a story: its skill requirements, the
//! skills it teaches, the nodes it leads to and the exploration that backs
//! it.

use crate::error::StoryError;
use crate::node_id::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The three id sets a node carries
///
/// Each set is kept as an ordered sequence without duplicates; order is the
/// order in which entries were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSet {
    /// Skills required before starting the node
    PrerequisiteSkills,
    /// Skills taught by the node
    AcquiredSkills,
    /// Nodes reachable from this one
    Destinations,
}

impl IdSet {
    /// All sets, in wire order
    pub const ALL: [Self; 3] = [
        Self::PrerequisiteSkills,
        Self::AcquiredSkills,
        Self::Destinations,
    ];

    /// Backend property name
    #[inline]
    #[must_use]
    pub const fn property_name(&self) -> &'static str {
        match self {
            Self::PrerequisiteSkills => "prerequisite_skill_ids",
            Self::AcquiredSkills => "acquired_skill_ids",
            Self::Destinations => "destination_node_ids",
        }
    }
}

impl Display for IdSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

/// A single node of a story
///
/// Mutators reject only structurally impossible states: duplicate entries
/// in an id set, or removing an entry that is not there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryNode {
    id: NodeId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    prerequisite_skill_ids: Vec<String>,
    #[serde(default)]
    acquired_skill_ids: Vec<String>,
    #[serde(default)]
    destination_node_ids: Vec<NodeId>,
    #[serde(default)]
    outline: String,
    #[serde(default)]
    exploration_id: Option<String>,
    #[serde(default)]
    outline_is_finalized: bool,
    #[serde(default)]
    thumbnail_filename: Option<String>,
    #[serde(default)]
    thumbnail_bg_color: Option<String>,
}

impl StoryNode {
    /// Create an empty node with the given title
    #[must_use]
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            prerequisite_skill_ids: Vec::new(),
            acquired_skill_ids: Vec::new(),
            destination_node_ids: Vec::new(),
            outline: String::new(),
            exploration_id: None,
            outline_is_finalized: false,
            thumbnail_filename: None,
            thumbnail_bg_color: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
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
    pub fn outline(&self) -> &str {
        &self.outline
    }

    #[inline]
    pub fn set_outline(&mut self, outline: impl Into<String>) {
        self.outline = outline.into();
    }

    /// Whether the outline has been finalized
    #[inline]
    #[must_use]
    pub fn outline_status(&self) -> bool {
        self.outline_is_finalized
    }

    #[inline]
    pub fn set_outline_status(&mut self, finalized: bool) {
        self.outline_is_finalized = finalized;
    }

    #[inline]
    #[must_use]
    pub fn exploration_id(&self) -> Option<&str> {
        self.exploration_id.as_deref()
    }

    #[inline]
    pub fn set_exploration_id(&mut self, exploration_id: Option<String>) {
        self.exploration_id = exploration_id;
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
    pub fn prerequisite_skill_ids(&self) -> &[String] {
        &self.prerequisite_skill_ids
    }

    #[inline]
    #[must_use]
    pub fn acquired_skill_ids(&self) -> &[String] {
        &self.acquired_skill_ids
    }

    #[inline]
    #[must_use]
    pub fn destination_node_ids(&self) -> &[NodeId] {
        &self.destination_node_ids
    }

    /// Check whether `value` is part of `set`
    #[must_use]
    pub fn contains(&self, set: IdSet, value: &str) -> bool {
        match set {
            IdSet::PrerequisiteSkills => self.prerequisite_skill_ids.iter().any(|s| s == value),
            IdSet::AcquiredSkills => self.acquired_skill_ids.iter().any(|s| s == value),
            IdSet::Destinations => self
                .destination_node_ids
                .iter()
                .any(|id| id.to_string() == value),
        }
    }

    /// Snapshot of a set in wire form
    #[must_use]
    pub fn id_set(&self, set: IdSet) -> Vec<String> {
        match set {
            IdSet::PrerequisiteSkills => self.prerequisite_skill_ids.clone(),
            IdSet::AcquiredSkills => self.acquired_skill_ids.clone(),
            IdSet::Destinations => self
                .destination_node_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Append `value` to `set`
    ///
    /// # Errors
    /// Returns error if the value is already present, or if it is not a
    /// valid node id when `set` is [`IdSet::Destinations`]
    pub fn add_to_set(&mut self, set: IdSet, value: &str) -> Result<(), StoryError> {
        if self.contains(set, value) {
            return Err(StoryError::DuplicateEntry {
                node_id: self.id,
                set,
                value: value.to_string(),
            });
        }
        match set {
            IdSet::PrerequisiteSkills => self.prerequisite_skill_ids.push(value.to_string()),
            IdSet::AcquiredSkills => self.acquired_skill_ids.push(value.to_string()),
            IdSet::Destinations => self.destination_node_ids.push(value.parse()?),
        }
        Ok(())
    }

    /// Remove `value` from `set`
    ///
    /// # Errors
    /// Returns error if the value is not present
    pub fn remove_from_set(&mut self, set: IdSet, value: &str) -> Result<(), StoryError> {
        if !self.contains(set, value) {
            return Err(StoryError::MissingEntry {
                node_id: self.id,
                set,
                value: value.to_string(),
            });
        }
        match set {
            IdSet::PrerequisiteSkills => self.prerequisite_skill_ids.retain(|s| s != value),
            IdSet::AcquiredSkills => self.acquired_skill_ids.retain(|s| s != value),
            IdSet::Destinations => self
                .destination_node_ids
                .retain(|id| id.to_string() != value),
        }
        Ok(())
    }

    /// Replace a whole set with `values`
    ///
    /// # Errors
    /// Returns error if `values` holds duplicates or, for destinations,
    /// malformed node ids. The node is unchanged on error.
    pub fn replace_set(&mut self, set: IdSet, values: &[String]) -> Result<(), StoryError> {
        for (i, value) in values.iter().enumerate() {
            if values[..i].contains(value) {
                return Err(StoryError::DuplicateEntry {
                    node_id: self.id,
                    set,
                    value: value.clone(),
                });
            }
        }
        match set {
            IdSet::PrerequisiteSkills => self.prerequisite_skill_ids = values.to_vec(),
            IdSet::AcquiredSkills => self.acquired_skill_ids = values.to_vec(),
            IdSet::Destinations => {
                self.destination_node_ids = values
                    .iter()
                    .map(|v| v.parse::<NodeId>())
                    .collect::<Result<_, _>>()?;
            }
        }
        Ok(())
    }

    /// Drop `target` from the destinations, if present
    pub(crate) fn forget_destination(&mut self, target: NodeId) {
        self.destination_node_ids.retain(|id| *id != target);
    }

    /// Prepublish issues for this node alone
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.title.trim().is_empty() {
            issues.push(format!("Chapter title of {} should not be empty", self.id));
        }

        if matches!(self.exploration_id.as_deref(), Some(e) if e.is_empty()) {
            issues.push(format!("Exploration id of {} cannot be empty", self.id));
        }

        if self.destination_node_ids.contains(&self.id) {
            issues.push(format!(
                "The destination node id of node with id {} points to itself.",
                self.id
            ));
        }

        for skill in &self.prerequisite_skill_ids {
            if self.acquired_skill_ids.contains(skill) {
                issues.push(format!(
                    "The skill with id {} is common to both the acquired and prerequisite \
                     skill id list in node with id {}",
                    skill, self.id
                ));
            }
        }

        issues
    }
}
