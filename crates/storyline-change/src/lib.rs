//! Storyline Change Tracking
//!
//! Typed change records for story edits and the undo/redo log that holds
//! them.
//!
//! # Core Concepts
//!
//! - [`StoryChange`]: One recorded edit, serialized in the backend's wire schema
//! - [`ReversibleChange`]: Records with an inverse ([`RevertChange`])
//! - [`IrreversibleChange`]: Records without one (node deletion)
//! - [`UndoRedoLog`]: Applied and undone records, committable change list
//!
//! # Example
//!
//! ```rust
//! use storyline_change::{PropertyValue, ReversibleChange, StoryProperty, UndoRedoLog};
//! use storyline_domain::Story;
//!
//! let mut story = Story::new("story_1", "Draft", "topic_1");
//! let mut log = UndoRedoLog::new();
//!
//! let change = ReversibleChange::UpdateStoryProperty {
//!     property_name: StoryProperty::Title,
//!     old_value: PropertyValue::from("Draft"),
//!     new_value: PropertyValue::from("Fractions"),
//! };
//! log.apply_change(change, &mut story)?;
//! assert_eq!(story.title(), "Fractions");
//!
//! log.undo_change(&mut story)?;
//! assert_eq!(story.title(), "Draft");
//! assert!(log.committable_change_list().is_empty());
//! # Ok::<(), storyline_change::ChangeError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod change;
mod error;
mod log;
mod property;

pub use change::{
    ApplyChange, IrreversibleChange, ReversibleChange, RevertChange, StoryChange,
    CMD_ADD_STORY_NODE, CMD_DELETE_STORY_NODE, CMD_UPDATE_STORY_CONTENTS_PROPERTY,
    CMD_UPDATE_STORY_NODE_OUTLINE_STATUS, CMD_UPDATE_STORY_NODE_PROPERTY,
    CMD_UPDATE_STORY_PROPERTY,
};
pub use error::{ChangeError, ReferenceRole};
pub use log::UndoRedoLog;
pub use property::{ContentsProperty, NodeProperty, PropertyValue, StoryProperty};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
