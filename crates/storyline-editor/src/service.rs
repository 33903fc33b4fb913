//! Story update service
//!
//! The only path through which a story is edited. Every operation validates
//! against the story first, builds a change record holding the old and new
//! values, then hands it to the [`UndoRedoLog`] which applies and records
//! it. A rejected operation leaves both the story and the log untouched.

use crate::config::EditorConfig;
use storyline_change::{
    ApplyChange, ChangeError, ContentsProperty, IrreversibleChange, NodeProperty, PropertyValue,
    ReferenceRole, ReversibleChange, StoryChange, StoryProperty, UndoRedoLog,
};
use storyline_domain::{IdSet, NodeId, Story, StoryError, StoryNode};

/// Outcome of validating an operation
type Planned = Result<Option<StoryChange>, ChangeError>;

/// Change-tracking editor for one story
#[derive(Debug, Clone, Default)]
pub struct StoryUpdateService {
    /// Applied and undone records
    log: UndoRedoLog,
    /// Configuration
    config: EditorConfig,
}

fn find_node(story: &Story, node_id: NodeId) -> Result<&StoryNode, ChangeError> {
    story
        .contents()
        .node(node_id)
        .ok_or_else(|| StoryError::NodeNotFound(node_id).into())
}

impl StoryUpdateService {
    /// Create service with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create service with `config`
    #[inline]
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            log: UndoRedoLog::new(),
            config,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Recorded changes
    #[inline]
    #[must_use]
    pub fn log(&self) -> &UndoRedoLog {
        &self.log
    }

    /// Revert the latest change
    ///
    /// # Errors
    /// Returns [`ChangeError::NotUndoable`] for a node deletion and
    /// [`ChangeError::NothingToUndo`] on an empty log
    pub fn undo(&mut self, story: &mut Story) -> Result<StoryChange, ChangeError> {
        self.log.undo_change(story)
    }

    /// Re-apply the latest undone change
    ///
    /// # Errors
    /// Returns [`ChangeError::NothingToRedo`] if nothing was undone
    pub fn redo(&mut self, story: &mut Story) -> Result<StoryChange, ChangeError> {
        self.log.redo_change(story)
    }

    /// Forget all recorded changes, after a successful save
    pub fn clear_changes(&mut self) {
        self.log.clear_changes();
    }

    fn submit(&mut self, story: &mut Story, planned: Planned) -> Result<(), ChangeError> {
        match planned {
            Ok(Some(change)) => self.log.apply_change(change, story),
            Ok(None) => Ok(()),
            Err(err) => {
                tracing::warn!("Rejected change: {}", err);
                Err(err)
            }
        }
    }

    fn is_noop<T: PartialEq>(&self, old: &T, new: &T) -> bool {
        !self.config.record_noop_changes && old == new
    }

    // Story properties

    fn plan_story_property(
        &self,
        story: &Story,
        property: StoryProperty,
        new: PropertyValue,
    ) -> Planned {
        let old = property.read(story);
        if self.is_noop(&old, &new) {
            tracing::debug!("Skipping unchanged story property {}", property);
            return Ok(None);
        }
        Ok(Some(
            ReversibleChange::UpdateStoryProperty {
                property_name: property,
                old_value: old,
                new_value: new,
            }
            .into(),
        ))
    }

    fn update_story_property(
        &mut self,
        story: &mut Story,
        property: StoryProperty,
        new: PropertyValue,
    ) -> Result<(), ChangeError> {
        let planned = self.plan_story_property(story, property, new);
        self.submit(story, planned)
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_title(&mut self, story: &mut Story, title: &str) -> Result<(), ChangeError> {
        self.update_story_property(story, StoryProperty::Title, title.into())
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_description(
        &mut self,
        story: &mut Story,
        description: &str,
    ) -> Result<(), ChangeError> {
        self.update_story_property(story, StoryProperty::Description, description.into())
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_notes(&mut self, story: &mut Story, notes: &str) -> Result<(), ChangeError> {
        self.update_story_property(story, StoryProperty::Notes, notes.into())
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_language_code(
        &mut self,
        story: &mut Story,
        language_code: &str,
    ) -> Result<(), ChangeError> {
        self.update_story_property(story, StoryProperty::LanguageCode, language_code.into())
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_thumbnail_filename(
        &mut self,
        story: &mut Story,
        filename: Option<&str>,
    ) -> Result<(), ChangeError> {
        let value = PropertyValue::from_optional(filename);
        self.update_story_property(story, StoryProperty::ThumbnailFilename, value)
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_thumbnail_bg_color(
        &mut self,
        story: &mut Story,
        color: Option<&str>,
    ) -> Result<(), ChangeError> {
        let value = PropertyValue::from_optional(color);
        self.update_story_property(story, StoryProperty::ThumbnailBgColor, value)
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_url_fragment(
        &mut self,
        story: &mut Story,
        url_fragment: &str,
    ) -> Result<(), ChangeError> {
        self.update_story_property(story, StoryProperty::UrlFragment, url_fragment.into())
    }

    /// # Errors
    /// Never fails for a well-formed story; see [`ChangeError`]
    pub fn set_story_meta_tag_content(
        &mut self,
        story: &mut Story,
        content: &str,
    ) -> Result<(), ChangeError> {
        self.update_story_property(story, StoryProperty::MetaTagContent, content.into())
    }

    // Node properties

    fn plan_node_property(
        &self,
        story: &Story,
        node_id: NodeId,
        property: NodeProperty,
        new: PropertyValue,
    ) -> Planned {
        let node = find_node(story, node_id)?;
        let old = property.read(node);
        if self.is_noop(&old, &new) {
            tracing::debug!("Skipping unchanged property {} of {}", property, node_id);
            return Ok(None);
        }
        Ok(Some(
            ReversibleChange::UpdateStoryNodeProperty {
                node_id,
                property_name: property,
                old_value: old,
                new_value: new,
            }
            .into(),
        ))
    }

    fn update_node_property(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        property: NodeProperty,
        new: PropertyValue,
    ) -> Result<(), ChangeError> {
        let planned = self.plan_node_property(story, node_id, property, new);
        self.submit(story, planned)
    }

    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn set_story_node_title(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        title: &str,
    ) -> Result<(), ChangeError> {
        self.update_node_property(story, node_id, NodeProperty::Title, title.into())
    }

    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn set_story_node_description(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        description: &str,
    ) -> Result<(), ChangeError> {
        self.update_node_property(story, node_id, NodeProperty::Description, description.into())
    }

    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn set_story_node_outline(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        outline: &str,
    ) -> Result<(), ChangeError> {
        self.update_node_property(story, node_id, NodeProperty::Outline, outline.into())
    }

    /// Link a node to an exploration, or unlink it with `None`
    ///
    /// # Errors
    /// - [`ChangeError::DuplicateReference`] if another node of the story
    ///   already holds `exploration_id`
    /// - [`StoryError::NodeNotFound`] if `node_id` names no node
    pub fn set_story_node_exploration_id(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        exploration_id: Option<&str>,
    ) -> Result<(), ChangeError> {
        let planned = self.plan_exploration_id(story, node_id, exploration_id);
        self.submit(story, planned)
    }

    fn plan_exploration_id(
        &self,
        story: &Story,
        node_id: NodeId,
        exploration_id: Option<&str>,
    ) -> Planned {
        find_node(story, node_id)?;
        if let Some(exploration_id) = exploration_id {
            if let Some(owner) = story.contents().exploration_owner(exploration_id) {
                if owner != node_id {
                    return Err(ChangeError::DuplicateReference {
                        exploration_id: exploration_id.to_string(),
                        owner,
                    });
                }
            }
        }
        let value = PropertyValue::from_optional(exploration_id);
        self.plan_node_property(story, node_id, NodeProperty::ExplorationId, value)
    }

    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn set_story_node_thumbnail_filename(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        filename: Option<&str>,
    ) -> Result<(), ChangeError> {
        let value = PropertyValue::from_optional(filename);
        self.update_node_property(story, node_id, NodeProperty::ThumbnailFilename, value)
    }

    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn set_story_node_thumbnail_bg_color(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        color: Option<&str>,
    ) -> Result<(), ChangeError> {
        let value = PropertyValue::from_optional(color);
        self.update_node_property(story, node_id, NodeProperty::ThumbnailBgColor, value)
    }

    // Outline status

    fn update_outline_status(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        finalized: bool,
    ) -> Result<(), ChangeError> {
        let planned: Planned = find_node(story, node_id).map(|node| {
            let old = node.outline_status();
            if self.is_noop(&old, &finalized) {
                return None;
            }
            Some(
                ReversibleChange::UpdateStoryNodeOutlineStatus {
                    node_id,
                    old_value: old,
                    new_value: finalized,
                }
                .into(),
            )
        });
        self.submit(story, planned)
    }

    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn finalize_story_node_outline(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
    ) -> Result<(), ChangeError> {
        self.update_outline_status(story, node_id, true)
    }

    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn unfinalize_story_node_outline(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
    ) -> Result<(), ChangeError> {
        self.update_outline_status(story, node_id, false)
    }

    // Contents properties

    /// Point the story at a new starting node, or at none
    ///
    /// # Errors
    /// Returns [`ChangeError::InvalidReference`] if `node_id` names no node
    pub fn set_initial_node_id(
        &mut self,
        story: &mut Story,
        node_id: Option<NodeId>,
    ) -> Result<(), ChangeError> {
        let planned = self.plan_initial_node_id(story, node_id);
        self.submit(story, planned)
    }

    fn plan_initial_node_id(&self, story: &Story, node_id: Option<NodeId>) -> Planned {
        if let Some(id) = node_id {
            if !story.contents().has_node(id) {
                return Err(ChangeError::InvalidReference {
                    node_id: id,
                    role: ReferenceRole::InitialNode,
                });
            }
        }
        let old = story.contents().initial_node_id();
        if self.is_noop(&old, &node_id) {
            return Ok(None);
        }
        Ok(Some(
            ReversibleChange::UpdateStoryContentsProperty {
                property_name: ContentsProperty::InitialNodeId,
                old_value: old,
                new_value: node_id,
            }
            .into(),
        ))
    }

    // Id sets

    /// Record the full before/after snapshot of one id set
    ///
    /// The edit is rehearsed on a copy of the node so duplicate and missing
    /// entries fail with the domain error before anything is recorded.
    fn plan_set_edit(
        story: &Story,
        node_id: NodeId,
        set: IdSet,
        edit: impl FnOnce(&mut StoryNode) -> Result<(), StoryError>,
    ) -> Planned {
        let node = find_node(story, node_id)?;
        let mut rehearsal = node.clone();
        edit(&mut rehearsal)?;
        Ok(Some(
            ReversibleChange::UpdateStoryNodeProperty {
                node_id,
                property_name: NodeProperty::for_set(set),
                old_value: node.id_set(set).into(),
                new_value: rehearsal.id_set(set).into(),
            }
            .into(),
        ))
    }

    fn add_to_set(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        set: IdSet,
        value: &str,
    ) -> Result<(), ChangeError> {
        let planned = Self::plan_set_edit(story, node_id, set, |n| n.add_to_set(set, value));
        self.submit(story, planned)
    }

    fn remove_from_set(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        set: IdSet,
        value: &str,
    ) -> Result<(), ChangeError> {
        let planned = Self::plan_set_edit(story, node_id, set, |n| n.remove_from_set(set, value));
        self.submit(story, planned)
    }

    /// # Errors
    /// Returns error if the node is unknown or already requires `skill_id`
    pub fn add_prerequisite_skill_id_to_node(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        skill_id: &str,
    ) -> Result<(), ChangeError> {
        self.add_to_set(story, node_id, IdSet::PrerequisiteSkills, skill_id)
    }

    /// # Errors
    /// Returns error if the node is unknown or does not require `skill_id`
    pub fn remove_prerequisite_skill_id_from_node(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        skill_id: &str,
    ) -> Result<(), ChangeError> {
        self.remove_from_set(story, node_id, IdSet::PrerequisiteSkills, skill_id)
    }

    /// # Errors
    /// Returns error if the node is unknown or already teaches `skill_id`
    pub fn add_acquired_skill_id_to_node(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        skill_id: &str,
    ) -> Result<(), ChangeError> {
        self.add_to_set(story, node_id, IdSet::AcquiredSkills, skill_id)
    }

    /// # Errors
    /// Returns error if the node is unknown or does not teach `skill_id`
    pub fn remove_acquired_skill_id_from_node(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        skill_id: &str,
    ) -> Result<(), ChangeError> {
        self.remove_from_set(story, node_id, IdSet::AcquiredSkills, skill_id)
    }

    /// Link `node_id` to `destination`
    ///
    /// # Errors
    /// - [`ChangeError::InvalidReference`] if `destination` names no node
    /// - [`ChangeError::ConstraintViolation`] if `destination` is the node itself
    /// - [`StoryError::DuplicateEntry`] if the link already exists
    pub fn add_destination_node_id_to_node(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        destination: NodeId,
    ) -> Result<(), ChangeError> {
        let planned = if story.contents().has_node(destination) {
            if node_id == destination {
                Err(ChangeError::constraint(format!(
                    "The story node cannot be a destination of itself: {node_id}"
                )))
            } else {
                let value = destination.to_string();
                Self::plan_set_edit(story, node_id, IdSet::Destinations, |n| {
                    n.add_to_set(IdSet::Destinations, &value)
                })
            }
        } else {
            Err(ChangeError::InvalidReference {
                node_id: destination,
                role: ReferenceRole::Destination,
            })
        };
        self.submit(story, planned)
    }

    /// # Errors
    /// Returns error if the node is unknown or has no link to `destination`
    pub fn remove_destination_node_id_from_node(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
        destination: NodeId,
    ) -> Result<(), ChangeError> {
        self.remove_from_set(story, node_id, IdSet::Destinations, &destination.to_string())
    }

    // Structure

    /// Append a node titled `title` under the next unused id
    ///
    /// # Errors
    /// Returns [`StoryError::IdSpaceExhausted`] if the id counter cannot
    /// advance; nothing is recorded in that case
    pub fn add_story_node(
        &mut self,
        story: &mut Story,
        title: &str,
    ) -> Result<NodeId, ChangeError> {
        let node_id = story.contents().next_node_id();
        let planned: Planned = match node_id.next() {
            Some(_) => Ok(Some(
                ReversibleChange::AddStoryNode {
                    node_id,
                    title: title.to_string(),
                }
                .into(),
            )),
            None => Err(StoryError::IdSpaceExhausted(node_id).into()),
        };
        self.submit(story, planned)?;
        Ok(node_id)
    }

    /// Remove a node and every destination link to it
    ///
    /// The record is irreversible. The sole remaining node may be deleted
    /// even when it is the initial node; the initial node id is cleared.
    ///
    /// # Errors
    /// - [`ChangeError::ConstraintViolation`] if `node_id` is the initial
    ///   node and other nodes remain
    /// - [`StoryError::NodeNotFound`] if `node_id` names no node
    pub fn delete_story_node(
        &mut self,
        story: &mut Story,
        node_id: NodeId,
    ) -> Result<(), ChangeError> {
        let planned = Self::plan_delete(story, node_id);
        self.submit(story, planned)
    }

    fn plan_delete(story: &Story, node_id: NodeId) -> Planned {
        find_node(story, node_id)?;
        let contents = story.contents();
        if contents.initial_node_id() == Some(node_id) && contents.nodes().len() > 1 {
            return Err(ChangeError::constraint("Cannot delete initial story node"));
        }
        let change = IrreversibleChange::DeleteStoryNode { node_id };
        tracing::debug!("Planned {} for {}", change.command(), node_id);
        Ok(Some(change.into()))
    }
}
