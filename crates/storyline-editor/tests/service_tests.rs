use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use storyline_change::{ChangeError, ReferenceRole};
use storyline_domain::{IdSet, Story, StoryError};
use storyline_editor::{EditorConfig, EditorSession, StoryUpdateService};
use storyline_test_utils::{init_tracing, node, sample_story, sample_story_json};

fn snapshot(story: &Story) -> serde_json::Value {
    serde_json::to_value(story).unwrap()
}

#[test]
fn add_prerequisite_then_undo() {
    init_tracing();
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    service
        .add_prerequisite_skill_id_to_node(&mut story, node("node_1"), "skill_3")
        .unwrap();

    let node_1 = story.contents().node(node("node_1")).unwrap();
    assert_eq!(node_1.prerequisite_skill_ids(), ["skill_1", "skill_3"]);
    assert_eq!(
        service.log().committable_change_list_json().unwrap(),
        json!([{
            "cmd": "update_story_node_property",
            "property_name": "prerequisite_skill_ids",
            "old_value": ["skill_1"],
            "new_value": ["skill_1", "skill_3"],
            "node_id": "node_1"
        }])
    );

    service.undo(&mut story).unwrap();
    let node_1 = story.contents().node(node("node_1")).unwrap();
    assert_eq!(node_1.prerequisite_skill_ids(), ["skill_1"]);
    assert!(service.log().committable_change_list().is_empty());
}

#[test]
fn story_setters_record_wire_shape() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    service.set_story_title(&mut story, "New title").unwrap();
    service.set_story_thumbnail_bg_color(&mut story, None).unwrap();
    service
        .set_story_node_exploration_id(&mut story, node("node_1"), Some("exp_2"))
        .unwrap();
    service.unfinalize_story_node_outline(&mut story, node("node_2")).unwrap();
    service.set_initial_node_id(&mut story, Some(node("node_1"))).unwrap();

    assert_eq!(
        service.log().committable_change_list_json().unwrap(),
        json!([
            {"cmd": "update_story_property", "property_name": "title",
             "old_value": "Story title", "new_value": "New title"},
            {"cmd": "update_story_property", "property_name": "thumbnail_bg_color",
             "old_value": "blue", "new_value": null},
            {"cmd": "update_story_node_property", "property_name": "exploration_id",
             "old_value": null, "new_value": "exp_2", "node_id": "node_1"},
            {"cmd": "update_story_node_outline_status",
             "old_value": true, "new_value": false, "node_id": "node_2"},
            {"cmd": "update_story_contents_property", "property_name": "initial_node_id",
             "old_value": "node_2", "new_value": "node_1"}
        ])
    );

    while service.log().can_undo() {
        service.undo(&mut story).unwrap();
    }
    assert_eq!(snapshot(&story), sample_story_json());
}

#[test]
fn finalize_outline_then_undo() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();
    let n = node("node_1");

    service.finalize_story_node_outline(&mut story, n).unwrap();
    assert!(story.contents().node(n).unwrap().outline_status());
    assert_eq!(
        service.log().committable_change_list_json().unwrap(),
        json!([{
            "cmd": "update_story_node_outline_status",
            "new_value": true,
            "old_value": false,
            "node_id": "node_1"
        }])
    );

    service.undo(&mut story).unwrap();
    assert!(!story.contents().node(n).unwrap().outline_status());
    assert!(!service.log().has_changes());
}

#[test]
fn node_thumbnail_setters_record_nullable_values() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();
    let n = node("node_1");

    service
        .set_story_node_thumbnail_filename(&mut story, n, Some("new.svg"))
        .unwrap();
    service
        .set_story_node_thumbnail_bg_color(&mut story, n, Some("red"))
        .unwrap();
    service
        .set_story_node_thumbnail_filename(&mut story, n, None)
        .unwrap();

    let node_1 = story.contents().node(n).unwrap();
    assert_eq!(node_1.thumbnail_filename(), None);
    assert_eq!(node_1.thumbnail_bg_color(), Some("red"));
    assert_eq!(
        service.log().committable_change_list_json().unwrap(),
        json!([
            {"cmd": "update_story_node_property", "property_name": "thumbnail_filename",
             "old_value": "fileName", "new_value": "new.svg", "node_id": "node_1"},
            {"cmd": "update_story_node_property", "property_name": "thumbnail_bg_color",
             "old_value": "blue", "new_value": "red", "node_id": "node_1"},
            {"cmd": "update_story_node_property", "property_name": "thumbnail_filename",
             "old_value": "new.svg", "new_value": null, "node_id": "node_1"}
        ])
    );

    while service.log().can_undo() {
        service.undo(&mut story).unwrap();
    }
    assert_eq!(snapshot(&story), sample_story_json());
}

#[test]
fn exhausted_id_counter_rejects_new_node() {
    let mut json = sample_story_json();
    json["story_contents"] = json!({
        "initial_node_id": null,
        "nodes": [],
        "next_node_id": "node_18446744073709551615"
    });
    let mut session =
        EditorSession::from_json(&json.to_string(), EditorConfig::default()).unwrap();

    let err = session
        .edit(|service, story| service.add_story_node(story, "x"))
        .unwrap_err();
    assert!(matches!(
        err.as_change(),
        Some(ChangeError::Story(StoryError::IdSpaceExhausted(_)))
    ));
    assert!(!session.service().log().has_changes());
    assert!(session.story().contents().nodes().is_empty());
    assert_eq!(
        session.story().contents().next_node_id().to_string(),
        "node_18446744073709551615"
    );
}

#[test]
fn add_story_node_mints_sequential_ids() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    let id = service.add_story_node(&mut story, "Title 3").unwrap();
    assert_eq!(id, node("node_3"));
    assert_eq!(story.contents().next_node_id(), node("node_4"));
    assert_eq!(
        service.log().committable_change_list_json().unwrap(),
        json!([{"cmd": "add_story_node", "node_id": "node_3", "title": "Title 3"}])
    );

    service.delete_story_node(&mut story, id).unwrap();
    let next = service.add_story_node(&mut story, "Title 4").unwrap();
    assert_eq!(next, node("node_4"));
    assert_eq!(story.contents().next_node_id(), node("node_5"));
}

#[test]
fn undone_add_does_not_reuse_id() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    service.add_story_node(&mut story, "Title 3").unwrap();
    service.undo(&mut story).unwrap();
    let id = service.add_story_node(&mut story, "Again").unwrap();
    assert_eq!(id, node("node_4"));
}

#[test]
fn deleting_initial_node_is_rejected() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();
    let before = snapshot(&story);

    let err = service
        .delete_story_node(&mut story, node("node_2"))
        .unwrap_err();
    assert!(matches!(err, ChangeError::ConstraintViolation(_)));
    assert_eq!(err.to_string(), "Cannot delete initial story node");
    assert_eq!(snapshot(&story), before);
    assert!(!service.log().has_changes());
}

#[test]
fn deleted_node_cannot_be_restored() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    service.delete_story_node(&mut story, node("node_1")).unwrap();
    let node_2 = story.contents().node(node("node_2")).unwrap();
    assert!(node_2.destination_node_ids().is_empty());

    let err = service.undo(&mut story).unwrap_err();
    assert!(matches!(err, ChangeError::NotUndoable { .. }));
    assert_eq!(
        service.log().committable_change_list_json().unwrap(),
        json!([{"cmd": "delete_story_node", "node_id": "node_1"}])
    );
}

#[test]
fn unknown_destination_is_invalid_reference() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    let err = service
        .add_destination_node_id_to_node(&mut story, node("node_1"), node("node_9"))
        .unwrap_err();
    assert!(matches!(
        err,
        ChangeError::InvalidReference { role: ReferenceRole::Destination, .. }
    ));
    assert!(err
        .to_string()
        .starts_with("The destination node with given id doesn't exist"));
    assert!(!service.log().has_changes());
}

#[test]
fn unknown_initial_node_is_invalid_reference() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    let err = service
        .set_initial_node_id(&mut story, Some(node("node_9")))
        .unwrap_err();
    assert!(matches!(
        err,
        ChangeError::InvalidReference { role: ReferenceRole::InitialNode, .. }
    ));
    assert_eq!(story.contents().initial_node_id(), Some(node("node_2")));
}

#[test]
fn taken_exploration_is_duplicate_reference() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    let err = service
        .set_story_node_exploration_id(&mut story, node("node_1"), Some("exp_1"))
        .unwrap_err();
    assert!(matches!(
        err,
        ChangeError::DuplicateReference { ref exploration_id, owner }
            if exploration_id == "exp_1" && owner == node("node_2")
    ));
    assert!(!service.log().has_changes());
    assert_eq!(
        story.contents().node(node("node_1")).unwrap().exploration_id(),
        None
    );
}

#[test]
fn duplicate_and_missing_entries_fail_without_record() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    let dup = service
        .add_acquired_skill_id_to_node(&mut story, node("node_1"), "skill_2")
        .unwrap_err();
    assert!(matches!(
        dup,
        ChangeError::Story(StoryError::DuplicateEntry { set: IdSet::AcquiredSkills, .. })
    ));

    let missing = service
        .remove_destination_node_id_from_node(&mut story, node("node_1"), node("node_2"))
        .unwrap_err();
    assert!(matches!(
        missing,
        ChangeError::Story(StoryError::MissingEntry { set: IdSet::Destinations, .. })
    ));
    assert!(!service.log().has_changes());
}

#[test]
fn destinations_add_and_remove() {
    let mut story = sample_story();
    let mut service = StoryUpdateService::new();

    service
        .add_destination_node_id_to_node(&mut story, node("node_1"), node("node_2"))
        .unwrap();
    service
        .remove_destination_node_id_from_node(&mut story, node("node_1"), node("node_2"))
        .unwrap();

    assert_eq!(snapshot(&story), sample_story_json());
    assert_eq!(
        service.log().committable_change_list_json().unwrap()[1],
        json!({
            "cmd": "update_story_node_property",
            "property_name": "destination_node_ids",
            "old_value": ["node_2"],
            "new_value": [],
            "node_id": "node_1"
        })
    );
}

#[test]
fn session_round_trip_with_redo() {
    let json = sample_story_json().to_string();
    let mut session = EditorSession::from_json(&json, EditorConfig::default()).unwrap();

    session
        .edit(|service, story| {
            service.remove_acquired_skill_id_from_node(story, node("node_2"), "skill_4")?;
            service.set_story_node_outline(story, node("node_2"), "Rewritten")
        })
        .unwrap();
    session.undo().unwrap();
    session.redo().unwrap();

    let node_2 = session.story().contents().node(node("node_2")).unwrap();
    assert_eq!(node_2.outline(), "Rewritten");
    assert!(node_2.acquired_skill_ids().is_empty());
    assert!(session.prepublish_issues().is_empty());
    assert_eq!(session.service().log().change_count(), 2);
}

#[derive(Debug, Clone)]
enum Setter {
    StoryTitle,
    StoryDescription,
    StoryNotes,
    StoryLanguage,
    StoryUrlFragment,
    StoryMetaTag,
    StoryThumbnail,
    NodeTitle,
    NodeDescription,
    NodeOutline,
    NodeExploration,
    NodeThumbnailFilename,
    NodeThumbnailColor,
    Finalize,
    Unfinalize,
    InitialNode,
}

fn setter() -> impl Strategy<Value = Setter> {
    prop_oneof![
        Just(Setter::StoryTitle),
        Just(Setter::StoryDescription),
        Just(Setter::StoryNotes),
        Just(Setter::StoryLanguage),
        Just(Setter::StoryUrlFragment),
        Just(Setter::StoryMetaTag),
        Just(Setter::StoryThumbnail),
        Just(Setter::NodeTitle),
        Just(Setter::NodeDescription),
        Just(Setter::NodeOutline),
        Just(Setter::NodeExploration),
        Just(Setter::NodeThumbnailFilename),
        Just(Setter::NodeThumbnailColor),
        Just(Setter::Finalize),
        Just(Setter::Unfinalize),
        Just(Setter::InitialNode),
    ]
}

fn call(
    service: &mut StoryUpdateService,
    story: &mut Story,
    setter: &Setter,
    value: &str,
) -> Result<(), ChangeError> {
    let n = node("node_1");
    match setter {
        Setter::StoryTitle => service.set_story_title(story, value),
        Setter::StoryDescription => service.set_story_description(story, value),
        Setter::StoryNotes => service.set_story_notes(story, value),
        Setter::StoryLanguage => service.set_story_language_code(story, value),
        Setter::StoryUrlFragment => service.set_story_url_fragment(story, value),
        Setter::StoryMetaTag => service.set_story_meta_tag_content(story, value),
        Setter::StoryThumbnail => service.set_story_thumbnail_filename(story, Some(value)),
        Setter::NodeTitle => service.set_story_node_title(story, n, value),
        Setter::NodeDescription => service.set_story_node_description(story, n, value),
        Setter::NodeOutline => service.set_story_node_outline(story, n, value),
        Setter::NodeExploration => service.set_story_node_exploration_id(story, n, Some(value)),
        Setter::NodeThumbnailFilename => {
            service.set_story_node_thumbnail_filename(story, n, Some(value))
        }
        Setter::NodeThumbnailColor => {
            service.set_story_node_thumbnail_bg_color(story, n, Some(value))
        }
        Setter::Finalize => service.finalize_story_node_outline(story, n),
        Setter::Unfinalize => service.unfinalize_story_node_outline(story, node("node_2")),
        Setter::InitialNode => service.set_initial_node_id(story, Some(n)),
    }
}

proptest! {
    #[test]
    fn prop_scalar_setter_then_undo_restores(setter in setter(), value in "[a-z_]{0,12}") {
        let mut story = sample_story();
        let mut service = StoryUpdateService::new();

        // exp_1 belongs to node_2; every other value is free for node_1
        prop_assume!(!(matches!(setter, Setter::NodeExploration) && value == "exp_1"));

        call(&mut service, &mut story, &setter, &value).unwrap();
        prop_assert_eq!(service.log().change_count(), 1);

        service.undo(&mut story).unwrap();
        prop_assert_eq!(snapshot(&story), sample_story_json());
        prop_assert!(!service.log().has_changes());
    }

    #[test]
    fn prop_skill_add_then_remove_restores(skill in "skill_[a-z]{1,6}") {
        let mut story = sample_story();
        let mut service = StoryUpdateService::new();
        let n = node("node_1");

        service.add_prerequisite_skill_id_to_node(&mut story, n, &skill).unwrap();
        service.remove_prerequisite_skill_id_from_node(&mut story, n, &skill).unwrap();
        prop_assert_eq!(snapshot(&story), sample_story_json());
        prop_assert_eq!(service.log().change_count(), 2);
    }
}
