//! Completion cache behavior alongside structure mutations

use super::test_utils::{Fixture, SCENARIO_DOC};
use ddd::completion::CompletionCache;
use ddd::tree::node::NewNode;
use ddd::types::NodeId;
use std::fs;
use std::time::Duration;

#[test]
fn test_two_root_queries_within_ttl_load_once() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let cache = CompletionCache::new(fixture.storage(), Duration::from_secs(60));

    assert_eq!(cache.get_or_resolve(""), vec!["path"]);
    assert_eq!(cache.get_or_resolve(""), vec!["path"]);
    assert_eq!(cache.load_count(), 1);
}

#[test]
fn test_mutation_invalidates_affected_paths() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let (mut manager, cache, _clock) = fixture.manager_with_cache(Duration::from_secs(300));

    assert_eq!(cache.get_or_resolve(""), vec!["path"]);
    assert_eq!(cache.get_or_resolve("path"), Vec::<String>::new());

    let set = manager.resolve_path(&["set"]).unwrap();
    manager.enable(&set).unwrap();
    assert!(!cache.is_fresh(""));
    assert!(cache.is_fresh("path"));
    assert_eq!(cache.get_or_resolve(""), vec!["path", "set"]);

    let path = manager.resolve_path(&["path"]).unwrap();
    manager.add_node(&path, NewNode::plugin("jump")).unwrap();
    assert_eq!(cache.get_or_resolve("path"), vec!["jump"]);
}

#[test]
fn test_set_child_enabled_invalidates_parent_entry() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let (mut manager, cache, _clock) = fixture.manager_with_cache(Duration::from_secs(300));
    assert_eq!(cache.get_or_resolve(""), vec!["path"]);

    assert!(manager.set_child_enabled(&NodeId::ROOT, "set", true).unwrap());
    assert!(!cache.is_fresh(""));
    assert_eq!(cache.get_or_resolve(""), vec!["path", "set"]);

    assert!(manager.set_child_enabled(&NodeId::ROOT, "path", false).unwrap());
    assert_eq!(cache.get_or_resolve(""), vec!["set"]);
}

#[test]
fn test_reorder_changes_cached_root_order() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let (mut manager, cache, _clock) = fixture.manager_with_cache(Duration::from_secs(300));
    manager.set_child_enabled(&NodeId::ROOT, "set", true).unwrap();
    assert_eq!(cache.get_or_resolve(""), vec!["path", "set"]);
    let loads = cache.load_count();

    manager
        .reorder_children(&NodeId::ROOT, &["set".to_string()])
        .unwrap();
    assert!(!cache.is_fresh(""));
    assert_eq!(cache.get_or_resolve(""), vec!["set", "path"]);
    assert_eq!(cache.load_count(), loads + 1);
}

#[test]
fn test_rescan_drops_descendant_entries() {
    let fixture = Fixture::new();
    let (mut manager, cache, _clock) = fixture.manager_with_cache(Duration::from_secs(300));
    let env = manager.resolve_path(&["env_config"]).unwrap();
    let tools = manager.add_node(&env, NewNode::page("tools")).unwrap();
    manager.add_node(&tools, NewNode::plugin("fmt")).unwrap();

    assert_eq!(cache.get_or_resolve("env_config"), vec!["tools"]);
    assert_eq!(cache.get_or_resolve("env_config/tools"), vec!["fmt"]);
    assert!(cache.get_or_resolve("path").is_empty());

    let removed = manager.rescan_node(&env).unwrap();
    assert_eq!(removed.len(), 2);
    assert!(!cache.is_fresh("env_config"));
    assert!(!cache.is_fresh("env_config/tools"));
    assert!(cache.is_fresh("path"));
    assert!(cache.get_or_resolve("env_config/tools").is_empty());
    assert!(cache.get_or_resolve("env_config").is_empty());
    assert_eq!(cache.get_or_resolve(""), vec!["path", "set", "env_config"]);
}

#[test]
fn test_removal_drops_descendant_entries() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let (mut manager, cache, _clock) = fixture.manager_with_cache(Duration::from_secs(300));
    let path = manager.resolve_path(&["path"]).unwrap();
    let sub = manager.add_node(&path, NewNode::page("sub")).unwrap();
    manager.add_node(&sub, NewNode::plugin("leaf")).unwrap();

    assert_eq!(cache.get_or_resolve("path/sub"), vec!["leaf"]);
    manager.remove_node(&path).unwrap();
    assert!(!cache.is_fresh("path/sub"));
    assert!(cache.get_or_resolve("path/sub").is_empty());
    assert!(cache.get_or_resolve("").is_empty());
}

#[test]
fn test_external_edit_visible_after_ttl() {
    let fixture = Fixture::with_document(SCENARIO_DOC);
    let (_manager, cache, clock) = fixture.manager_with_cache(Duration::from_secs(10));
    assert_eq!(cache.get_or_resolve(""), vec!["path"]);

    fs::write(
        &fixture.structure_path,
        SCENARIO_DOC.replace(r#""enabled": false"#, r#""enabled": true"#),
    )
    .unwrap();
    clock.advance(Duration::from_secs(9));
    assert_eq!(cache.get_or_resolve(""), vec!["path"]);
    clock.advance(Duration::from_secs(2));
    assert_eq!(cache.get_or_resolve(""), vec!["path", "set"]);
}

#[test]
fn test_missing_and_corrupt_documents_complete_to_nothing() {
    let fixture = Fixture::new();
    let cache = CompletionCache::new(fixture.storage(), Duration::from_secs(60));
    assert!(cache.complete("").is_empty());
    assert!(!fixture.structure_path.exists());

    fs::write(&fixture.structure_path, r#"{"1": {"name": "orphan"}}"#).unwrap();
    assert!(cache.complete("").is_empty());
    assert_eq!(cache.len(), 0);
}
