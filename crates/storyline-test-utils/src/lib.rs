//! Testing utilities for the storyline workspace
//!
//! Shared fixtures and tracing setup.

#![allow(missing_docs)]

use std::sync::Once;
use storyline_domain::{NodeId, Story};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber once per process
///
/// Honors `RUST_LOG`, defaulting to `debug` for the storyline crates.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("storyline_change=debug,storyline_editor=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Backend snapshot of the sample story
///
/// Two nodes: `node_1` (prerequisite `skill_1`, acquired `skill_2`, no
/// destinations) and `node_2` (initial, prerequisite `skill_3`, acquired
/// `skill_4`, exploration `exp_1`, leads to `node_1`). Counter at `node_3`.
pub fn sample_story_json() -> serde_json::Value {
    serde_json::json!({
        "id": "sample_story_id",
        "title": "Story title",
        "description": "Story description",
        "notes": "Story notes",
        "version": 1,
        "corresponding_topic_id": "topic_id",
        "story_contents": {
            "initial_node_id": "node_2",
            "nodes": [
                {
                    "id": "node_1",
                    "title": "Title 1",
                    "description": "Description 1",
                    "prerequisite_skill_ids": ["skill_1"],
                    "acquired_skill_ids": ["skill_2"],
                    "destination_node_ids": [],
                    "outline": "Outline",
                    "exploration_id": null,
                    "outline_is_finalized": false,
                    "thumbnail_filename": "fileName",
                    "thumbnail_bg_color": "blue"
                },
                {
                    "id": "node_2",
                    "title": "Title 2",
                    "description": "Description 2",
                    "prerequisite_skill_ids": ["skill_3"],
                    "acquired_skill_ids": ["skill_4"],
                    "destination_node_ids": ["node_1"],
                    "outline": "Outline 2",
                    "exploration_id": "exp_1",
                    "outline_is_finalized": true,
                    "thumbnail_filename": "fileName",
                    "thumbnail_bg_color": "blue"
                }
            ],
            "next_node_id": "node_3"
        },
        "language_code": "en",
        "thumbnail_filename": "fileName",
        "thumbnail_bg_color": "blue",
        "url_fragment": "story-title",
        "meta_tag_content": "story meta"
    })
}

/// The sample story, loaded from [`sample_story_json`]
pub fn sample_story() -> Story {
    Story::from_value(sample_story_json()).expect("sample story snapshot is valid")
}

/// Parse a `node_<N>` id, panicking on malformed input
pub fn node(id: &str) -> NodeId {
    id.parse().expect("valid node id")
}
