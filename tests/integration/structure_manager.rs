//! Integration tests for the Structure Manager over a real config directory

use super::test_utils::{Fixture, SCENARIO_DOC};
use ddd::error::{ApiError, StorageError};
use ddd::tree::node::NewNode;
use ddd::types::NodeId;
use std::fs;

#[test]
fn test_disabled_child_hidden_from_listing() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let mut manager = fixture.manager();

    assert_eq!(manager.completions_for_node(&NodeId::ROOT).unwrap(), vec!["path"]);
    let all: Vec<String> = manager
        .get_child_nodes(&NodeId::ROOT)
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(all, vec!["path", "set"]);
}

#[test]
fn test_missing_segment_reports_index() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let mut manager = fixture.manager();

    match manager.resolve_path(&["path", "sub"]) {
        Err(ApiError::PathNotFound { index, segment }) => {
            assert_eq!(index, 1);
            assert_eq!(segment, "sub");
        }
        other => panic!("expected PathNotFound, got {:?}", other.map(|id| id.0)),
    }
}

#[test]
fn test_external_edit_seen_by_next_operation() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let mut manager = fixture.manager();
    assert_eq!(manager.completions_for_node(&NodeId::ROOT).unwrap(), vec!["path"]);

    fs::write(
        &fixture.structure_path,
        SCENARIO_DOC.replace(r#""enabled": false"#, r#""enabled": true"#),
    )
    .unwrap();
    assert_eq!(
        manager.completions_for_node(&NodeId::ROOT).unwrap(),
        vec!["path", "set"]
    );
}

#[test]
fn test_cascade_delete_leaves_no_dangling_ids() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let mut manager = fixture.manager();
    let path = manager.resolve_path(&["path"]).unwrap();
    let tools = manager.add_node(&path, NewNode::page("tools")).unwrap();
    let fmt = manager.add_node(&tools, NewNode::plugin("fmt")).unwrap();
    manager.add_node(&tools, NewNode::plugin("lint")).unwrap();

    let removed = manager.remove_node(&tools).unwrap();
    assert_eq!(removed.len(), 3);
    assert!(removed.contains(&fmt));

    let doc = fixture.read_document();
    let object = doc.as_object().unwrap();
    assert!(!object.contains_key(&fmt.to_string()));
    for node in object.values() {
        for child in node["children"].as_array().unwrap() {
            let key = child.as_u64().unwrap().to_string();
            assert!(object.contains_key(&key), "dangling child {}", key);
        }
    }
}

#[test]
fn test_root_cannot_be_removed() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let mut manager = fixture.manager();
    assert!(matches!(
        manager.remove_node(&NodeId::ROOT),
        Err(ApiError::InvalidOperation(_))
    ));
}

#[test]
fn test_unknown_fields_survive_mutation() {
    let fixture = Fixture::with_document(
        r#"{
            "0": {"children": [1, 2]},
            "1": {"name": "path", "shortcut": "p", "tags": ["nav"]},
            "2": {"name": "set"}
        }"#,
    );
    let mut manager = fixture.manager();
    let set = manager.resolve_path(&["set"]).unwrap();
    manager.disable(&set).unwrap();

    let doc = fixture.read_document();
    assert_eq!(doc["1"]["shortcut"], "p");
    assert_eq!(doc["1"]["tags"][0], "nav");
    assert_eq!(doc["2"]["enabled"], false);
    assert_eq!(doc["0"]["children"], serde_json::json!([1, 2]));
}

#[test]
fn test_failed_save_keeps_previous_document() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let mut manager = fixture.manager();
    let before = fs::read_to_string(&fixture.structure_path).unwrap();

    // A directory squatting on the temp name makes the write fail.
    fs::create_dir(fixture.path().join("structure.json.tmp")).unwrap();
    let result = manager.add_node(&NodeId::ROOT, NewNode::plugin("tools"));
    assert!(matches!(result, Err(ApiError::StorageError(StorageError::IoError(_)))));

    assert_eq!(fs::read_to_string(&fixture.structure_path).unwrap(), before);
    assert_eq!(manager.completions_for_node(&NodeId::ROOT).unwrap(), vec!["path"]);
}

#[test]
fn test_corrupt_document_is_distinguishable() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let mut manager = fixture.manager();

    // Node 1 is listed by both 0 and 2.
    fs::write(
        &fixture.structure_path,
        r#"{"0": {"children": [1]}, "1": {"name": "a", "children": [2]}, "2": {"name": "b", "children": [1]}}"#,
    )
    .unwrap();
    match manager.get_node(&NodeId::ROOT) {
        Err(ApiError::StorageError(e)) => assert!(e.is_corrupt()),
        other => panic!("expected corrupt document, got {:?}", other.map(|n| n.id)),
    }
}

#[test]
fn test_reorder_and_rescan() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    assert!(fixture.structure_path.exists());

    manager
        .reorder_children(&NodeId::ROOT, &["env_config".to_string(), "path".to_string()])
        .unwrap();
    assert_eq!(
        manager.completions_for_node(&NodeId::ROOT).unwrap(),
        vec!["env_config", "path", "set"]
    );

    manager.remove_child(&NodeId::ROOT, "set").unwrap();
    manager.rescan_node(&NodeId::ROOT).unwrap();
    assert_eq!(
        manager.completions_for_node(&NodeId::ROOT).unwrap(),
        vec!["path", "set", "env_config"]
    );
}

#[test]
fn test_set_child_enabled_and_statistics() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    assert!(manager.set_child_enabled(&NodeId::ROOT, "set", false).unwrap());
    assert!(!manager.set_child_enabled(&NodeId::ROOT, "set", false).unwrap());

    let stats = manager.statistics().unwrap();
    assert_eq!(stats.nodes, 4);
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.plugins, 2);
    assert_eq!(stats.disabled, 1);
    assert_eq!(stats.max_depth, 1);
    assert_eq!(stats.unreachable, 0);
}

#[test]
fn test_add_node_with_exhausted_ids_leaves_document_untouched() {
    let doc = r#"{
    "0": {"children": [18446744073709551615]},
    "18446744073709551615": {"name": "last", "enabled": true}
}"#;
    let fixture = Fixture::with_document(doc);
    let before = fs::read_to_string(&fixture.structure_path).unwrap();
    let mut manager = fixture.manager();

    let result = manager.add_node(&NodeId::ROOT, NewNode::plugin("x"));
    assert!(matches!(result, Err(ApiError::InvalidOperation(_))));
    assert_eq!(fs::read_to_string(&fixture.structure_path).unwrap(), before);
    assert_eq!(manager.completions_for_node(&NodeId::ROOT).unwrap(), vec!["last"]);
}
