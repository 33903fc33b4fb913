//! Storyline Domain
//!
//! In-memory model of an editable story.
//!
//! # Core Concepts
//!
//! - [`Story`]: Root aggregate, (de)serializes to the backend snapshot dict
//! - [`StoryContents`]: Ordered node list, initial node, id counter
//! - [`StoryNode`]: One chapter with skill and destination id sets
//! - [`NodeId`]: `node_<N>` identifier, minted monotonically
//!
//! Mutators here reject only structurally impossible states. Domain rules
//! are enforced by the change-tracking layer that records every edit.
//!
//! # Example
//!
//! ```rust
//! use storyline_domain::Story;
//!
//! let mut story = Story::new("story_1", "Fractions", "topic_1");
//! let first = story.contents_mut().add_node("Halves")?;
//!
//! assert_eq!(first.to_string(), "node_1");
//! assert_eq!(story.contents().initial_node_id(), Some(first));
//! assert_eq!(story.contents().next_node_id().to_string(), "node_2");
//! # Ok::<(), storyline_domain::StoryError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod contents;
mod error;
mod node;
mod node_id;
mod story;

pub use contents::StoryContents;
pub use error::StoryError;
pub use node::{IdSet, StoryNode};
pub use node_id::{NodeId, NodeIdError, NODE_ID_PREFIX};
pub use story::{Story, DEFAULT_LANGUAGE_CODE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
