//! Story contents: the node graph of a story
//!
//! Provides [`StoryContents`], which owns the ordered node list, the
//! initial node reference and the counter node ids are minted from.

use crate::error::StoryError;
use crate::node::StoryNode;
use crate::node_id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Node graph of a story
///
/// # Invariants
/// - node ids are unique
/// - `initial_node_id`, when set, names a node in `nodes`
/// - `next_node_id` is greater than every id ever minted; ids are never
///   reused, even after deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryContents {
    initial_node_id: Option<NodeId>,
    #[serde(default)]
    nodes: Vec<StoryNode>,
    next_node_id: NodeId,
}

impl StoryContents {
    /// Empty contents; the first node minted will be `node_1`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            initial_node_id: None,
            nodes: Vec::new(),
            next_node_id: NodeId::first(),
        }
    }

    #[inline]
    #[must_use]
    pub fn initial_node_id(&self) -> Option<NodeId> {
        self.initial_node_id
    }

    /// Point the story at a new starting node
    ///
    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn set_initial_node_id(&mut self, node_id: Option<NodeId>) -> Result<(), StoryError> {
        if let Some(id) = node_id {
            if !self.has_node(id) {
                return Err(StoryError::NodeNotFound(id));
            }
        }
        self.initial_node_id = node_id;
        Ok(())
    }

    /// Nodes in display order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[StoryNode] {
        &self.nodes
    }

    /// Id the next added node will receive
    #[inline]
    #[must_use]
    pub fn next_node_id(&self) -> NodeId {
        self.next_node_id
    }

    /// Position of a node in display order
    #[inline]
    #[must_use]
    pub fn node_index(&self, node_id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == node_id)
    }

    #[inline]
    #[must_use]
    pub fn has_node(&self, node_id: NodeId) -> bool {
        self.node_index(node_id).is_some()
    }

    #[inline]
    #[must_use]
    pub fn node(&self, node_id: NodeId) -> Option<&StoryNode> {
        self.nodes.iter().find(|n| n.id() == node_id)
    }

    /// Mutable access to a node
    ///
    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn node_mut(&mut self, node_id: NodeId) -> Result<&mut StoryNode, StoryError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id() == node_id)
            .ok_or(StoryError::NodeNotFound(node_id))
    }

    /// Node ids in display order
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(StoryNode::id).collect()
    }

    /// Node currently linked to `exploration_id`, if any
    #[must_use]
    pub fn exploration_owner(&self, exploration_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.exploration_id() == Some(exploration_id))
            .map(StoryNode::id)
    }

    /// Mint a node id, append an empty node with `title` and return its id
    ///
    /// The first node added to empty-rooted contents becomes the initial
    /// node.
    ///
    /// # Errors
    /// Returns [`StoryError::IdSpaceExhausted`] if the counter cannot advance
    /// past the id it would hand out; nothing is added in that case
    pub fn add_node(&mut self, title: impl Into<String>) -> Result<NodeId, StoryError> {
        let id = self.next_node_id;
        self.next_node_id = id.next().ok_or(StoryError::IdSpaceExhausted(id))?;
        self.push_node(StoryNode::new(id, title));
        Ok(id)
    }

    /// Append an empty node under a previously minted id
    ///
    /// Used when replaying a recorded node addition. The counter is moved
    /// past `node_id` if needed so it is never handed out again.
    ///
    /// # Errors
    /// Returns error if a node with `node_id` already exists, or if the
    /// counter cannot advance past `node_id`
    pub fn add_node_with_id(
        &mut self,
        node_id: NodeId,
        title: impl Into<String>,
    ) -> Result<(), StoryError> {
        if self.has_node(node_id) {
            return Err(StoryError::DuplicateNode(node_id));
        }
        if node_id >= self.next_node_id {
            self.next_node_id = node_id
                .next()
                .ok_or(StoryError::IdSpaceExhausted(node_id))?;
        }
        self.push_node(StoryNode::new(node_id, title));
        Ok(())
    }

    fn push_node(&mut self, node: StoryNode) {
        if self.initial_node_id.is_none() {
            self.initial_node_id = Some(node.id());
        }
        self.nodes.push(node);
    }

    /// Remove a node and every link pointing at it
    ///
    /// Clears the initial node id if it referenced the removed node. The
    /// counter is left untouched.
    ///
    /// # Errors
    /// Returns error if `node_id` names no node
    pub fn delete_node(&mut self, node_id: NodeId) -> Result<StoryNode, StoryError> {
        let index = self
            .node_index(node_id)
            .ok_or(StoryError::NodeNotFound(node_id))?;
        let removed = self.nodes.remove(index);

        if self.initial_node_id == Some(node_id) {
            self.initial_node_id = None;
        }
        for node in &mut self.nodes {
            node.forget_destination(node_id);
        }

        Ok(removed)
    }

    /// Verify the hard invariants
    ///
    /// # Errors
    /// Returns the first violation found
    pub fn check_invariants(&self) -> Result<(), StoryError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id()) {
                return Err(StoryError::DuplicateNode(node.id()));
            }
            if node.id() >= self.next_node_id {
                return Err(StoryError::InvariantViolation(format!(
                    "next node id {} is not greater than existing node id {}",
                    self.next_node_id,
                    node.id()
                )));
            }
        }

        if let Some(initial) = self.initial_node_id {
            if !seen.contains(&initial) {
                return Err(StoryError::InvariantViolation(format!(
                    "initial node {initial} is not present in the story"
                )));
            }
        }

        let mut explorations: Vec<(&str, NodeId)> = Vec::new();
        for node in &self.nodes {
            for dest in node.destination_node_ids() {
                if !seen.contains(dest) {
                    return Err(StoryError::InvariantViolation(format!(
                        "destination {dest} of node {} is not present in the story",
                        node.id()
                    )));
                }
            }
            if let Some(exp) = node.exploration_id() {
                if let Some((_, owner)) = explorations.iter().find(|(e, _)| *e == exp) {
                    return Err(StoryError::InvariantViolation(format!(
                        "exploration {exp} is linked to both {owner} and {}",
                        node.id()
                    )));
                }
                explorations.push((exp, node.id()));
            }
        }

        Ok(())
    }

    /// Prepublish issues for the node graph
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.nodes.is_empty() {
            issues.push("The story should have at least one chapter.".to_string());
            return issues;
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id()) {
                issues.push(format!("The node with id {} is duplicated in the story", node.id()));
            }
            if node.id() >= self.next_node_id {
                issues.push(format!(
                    "The node with id {} is greater than or equal to {}",
                    node.id(),
                    self.next_node_id
                ));
            }
            issues.extend(node.validate());
            for dest in node.destination_node_ids() {
                if !self.has_node(*dest) {
                    issues.push(format!(
                        "The node with id {dest} doesn't exist but is a destination of {}",
                        node.id()
                    ));
                }
            }
        }

        match self.initial_node_id {
            None => issues.push("The story should have an initial chapter.".to_string()),
            Some(initial) if !seen.contains(&initial) => {
                issues.push(format!("Initial node - {initial} - is not present in the story"));
            }
            Some(initial) => {
                let reachable = self.reachable_from(initial);
                for node in &self.nodes {
                    if !reachable.contains(&node.id()) {
                        issues.push(format!(
                            "The node with id {} is disconnected from the story graph.",
                            node.id()
                        ));
                    }
                }
            }
        }

        issues
    }

    /// Ids reachable from `start` along destination links (inclusive)
    #[must_use]
    pub fn reachable_from(&self, start: NodeId) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(node) = self.node(id) {
                queue.extend(node.destination_node_ids().iter().copied());
            }
        }
        visited
    }
}

impl Default for StoryContents {
    fn default() -> Self {
        Self::new()
    }
}
