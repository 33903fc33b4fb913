//! Story node identifiers
//!
//! Provides [`NodeId`], the `node_<N>` identifier minted by a story's
//! contents counter.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Prefix shared by every node id
pub const NODE_ID_PREFIX: &str = "node_";

/// Identifier of a node within a story
///
/// Wire form is `node_<N>` with `N >= 1`. Ordering and equality follow the
/// numeric suffix, so `node_10` sorts after `node_9`.
///
/// # Examples
/// - `node_1` → suffix `1`
/// - `node_42` → suffix `42`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(u64);

impl NodeId {
    /// Create id from its numeric suffix
    ///
    /// # Errors
    /// Returns error if `number` is zero
    #[inline]
    pub fn new(number: u64) -> Result<Self, NodeIdError> {
        if number == 0 {
            return Err(NodeIdError::ZeroSuffix);
        }
        Ok(Self(number))
    }

    /// First id a fresh story hands out (`node_1`)
    #[inline]
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    /// Numeric suffix
    #[inline]
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.0
    }

    /// The id minted right after this one, or `None` once the suffix space
    /// is used up
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(number) => Some(Self(number)),
            None => None,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::first()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NODE_ID_PREFIX, self.0)
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix(NODE_ID_PREFIX)
            .ok_or_else(|| NodeIdError::MissingPrefix(s.to_string()))?;

        // Reject signs and leading zeros so the wire form round-trips
        if suffix.is_empty()
            || !suffix.bytes().all(|b| b.is_ascii_digit())
            || (suffix.len() > 1 && suffix.starts_with('0'))
        {
            return Err(NodeIdError::InvalidSuffix(s.to_string()));
        }

        let number = suffix
            .parse::<u64>()
            .map_err(|_| NodeIdError::InvalidSuffix(s.to_string()))?;
        Self::new(number)
    }
}

impl TryFrom<String> for NodeId {
    type Error = NodeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for NodeId {
    type Error = NodeIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

/// Errors related to node ids
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdError {
    /// Id does not start with `node_`
    #[error("node id '{0}' must start with 'node_'")]
    MissingPrefix(String),

    /// Suffix is not a canonical positive integer
    #[error("node id '{0}' has an invalid numeric suffix")]
    InvalidSuffix(String),

    /// Suffix is zero
    #[error("node ids start at node_1")]
    ZeroSuffix,
}
