//! Storyline Editor
//!
//! Change-tracked editing of a story.
//!
//! - [`StoryUpdateService`]: One operation per editable field or structural change
//! - [`EditorSession`]: Owns a story and its service for one editing session
//! - [`EditorConfig`]: Snapshot validation and no-op recording switches
//!
//! Every edit is validated before anything changes, applied to the story and
//! recorded as a [`StoryChange`] in the backend's wire schema.
//!
//! # Example
//!
//! ```rust
//! use storyline_domain::Story;
//! use storyline_editor::StoryUpdateService;
//!
//! let mut story = Story::new("story_1", "Fractions", "topic_1");
//! let mut service = StoryUpdateService::new();
//!
//! let halves = service.add_story_node(&mut story, "Halves")?;
//! service.add_prerequisite_skill_id_to_node(&mut story, halves, "skill_1")?;
//! assert_eq!(service.log().change_count(), 2);
//!
//! service.undo(&mut story)?;
//! assert!(story.contents().node(halves).unwrap().prerequisite_skill_ids().is_empty());
//! # Ok::<(), storyline_change::ChangeError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod service;
mod session;

pub use config::EditorConfig;
pub use error::EditorError;
pub use service::StoryUpdateService;
pub use session::EditorSession;
pub use storyline_change::{ChangeError, StoryChange};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
