use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use storyline_change::{
    ChangeError, IrreversibleChange, NodeProperty, PropertyValue, ReversibleChange, StoryChange,
    UndoRedoLog,
};
use storyline_domain::IdSet;
use storyline_test_utils::{init_tracing, node, sample_story, sample_story_json};

#[test]
fn committable_list_matches_backend_schema() {
    init_tracing();
    let mut story = sample_story();
    let mut log = UndoRedoLog::new();

    log.apply_change(
        ReversibleChange::UpdateStoryNodeProperty {
            node_id: node("node_1"),
            property_name: NodeProperty::PrerequisiteSkillIds,
            old_value: vec!["skill_1".to_string()].into(),
            new_value: vec!["skill_1".to_string(), "skill_3".to_string()].into(),
        },
        &mut story,
    )
    .unwrap();
    log.apply_change(
        ReversibleChange::AddStoryNode {
            node_id: node("node_3"),
            title: "Title 3".into(),
        },
        &mut story,
    )
    .unwrap();
    log.apply_change(
        IrreversibleChange::DeleteStoryNode {
            node_id: node("node_3"),
        },
        &mut story,
    )
    .unwrap();

    assert_eq!(
        log.committable_change_list_json().unwrap(),
        json!([
            {
                "cmd": "update_story_node_property",
                "property_name": "prerequisite_skill_ids",
                "old_value": ["skill_1"],
                "new_value": ["skill_1", "skill_3"],
                "node_id": "node_1"
            },
            {"cmd": "add_story_node", "node_id": "node_3", "title": "Title 3"},
            {"cmd": "delete_story_node", "node_id": "node_3"}
        ])
    );
    assert_eq!(story.contents().next_node_id(), node("node_4"));
}

#[test]
fn change_list_deserializes_back() {
    let list = json!([
        {"cmd": "update_story_property", "property_name": "thumbnail_bg_color",
         "old_value": "blue", "new_value": null},
        {"cmd": "update_story_node_outline_status", "node_id": "node_1",
         "old_value": false, "new_value": true},
        {"cmd": "delete_story_node", "node_id": "node_1"}
    ]);
    let changes: Vec<StoryChange> = serde_json::from_value(list.clone()).unwrap();
    assert_eq!(changes.len(), 3);
    assert!(changes[0].is_reversible());
    assert!(!changes[2].is_reversible());
    assert_eq!(serde_json::to_value(&changes).unwrap(), list);
}

#[test]
fn undo_add_node_then_redo_reuses_recorded_id() {
    let mut story = sample_story();
    let mut log = UndoRedoLog::new();
    let add = ReversibleChange::AddStoryNode {
        node_id: node("node_3"),
        title: "Title 3".into(),
    };

    log.apply_change(add, &mut story).unwrap();
    log.undo_change(&mut story).unwrap();
    assert!(!story.contents().has_node(node("node_3")));
    assert_eq!(story.contents().next_node_id(), node("node_4"));

    log.redo_change(&mut story).unwrap();
    assert!(story.contents().has_node(node("node_3")));
    story.check_invariants().unwrap();
}

#[test]
fn failed_undo_leaves_story_and_log() {
    let mut story = sample_story();
    let mut log = UndoRedoLog::new();
    log.apply_change(
        IrreversibleChange::DeleteStoryNode {
            node_id: node("node_1"),
        },
        &mut story,
    )
    .unwrap();
    let before = serde_json::to_value(&story).unwrap();

    assert!(matches!(
        log.undo_change(&mut story),
        Err(ChangeError::NotUndoable { .. })
    ));
    assert_eq!(serde_json::to_value(&story).unwrap(), before);
    assert_eq!(log.change_count(), 1);
}

#[derive(Debug, Clone)]
enum Edit {
    AddSkill(usize),
    RemoveFirst,
    Retitle(String),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..6).prop_map(Edit::AddSkill),
        Just(Edit::RemoveFirst),
        "[a-z]{1,8}".prop_map(Edit::Retitle),
    ]
}

fn record(story: &storyline_domain::Story, edit: &Edit) -> Option<ReversibleChange> {
    let id = node("node_1");
    let current = story.contents().node(id)?;
    match edit {
        Edit::AddSkill(n) => {
            let skill = format!("skill_x{n}");
            if current.contains(IdSet::AcquiredSkills, &skill) {
                return None;
            }
            let old = current.id_set(IdSet::AcquiredSkills);
            let mut new = old.clone();
            new.push(skill);
            Some(ReversibleChange::UpdateStoryNodeProperty {
                node_id: id,
                property_name: NodeProperty::AcquiredSkillIds,
                old_value: old.into(),
                new_value: new.into(),
            })
        }
        Edit::RemoveFirst => {
            let old = current.id_set(IdSet::AcquiredSkills);
            let first = old.first()?.clone();
            let new: Vec<String> = old.iter().filter(|s| **s != first).cloned().collect();
            Some(ReversibleChange::UpdateStoryNodeProperty {
                node_id: id,
                property_name: NodeProperty::AcquiredSkillIds,
                old_value: old.into(),
                new_value: new.into(),
            })
        }
        Edit::Retitle(title) => Some(ReversibleChange::UpdateStoryNodeProperty {
            node_id: id,
            property_name: NodeProperty::Title,
            old_value: PropertyValue::from(current.title()),
            new_value: PropertyValue::from(title.as_str()),
        }),
    }
}

proptest! {
    #[test]
    fn prop_undo_all_restores_snapshot(edits in prop::collection::vec(edit(), 1..20)) {
        let mut story = sample_story();
        let mut log = UndoRedoLog::new();

        for e in &edits {
            if let Some(change) = record(&story, e) {
                log.apply_change(change, &mut story).unwrap();
            }
        }
        let edited = serde_json::to_value(&story).unwrap();

        while log.can_undo() {
            log.undo_change(&mut story).unwrap();
        }
        prop_assert_eq!(serde_json::to_value(&story).unwrap(), sample_story_json());

        while log.can_redo() {
            log.redo_change(&mut story).unwrap();
        }
        prop_assert_eq!(serde_json::to_value(&story).unwrap(), edited);
    }
}
