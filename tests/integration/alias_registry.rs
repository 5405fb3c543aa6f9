//! Short-name registry persistence and path-jump behavior

use super::test_utils::Fixture;
use ddd::alias::AliasRegistry;
use ddd::capability::Outcome;
use ddd::error::ApiError;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_resolve_scenario() {
    let fixture = Fixture::new();
    fs::write(&fixture.paths_path, r#"{"proj": "/home/u/projects/demo"}"#).unwrap();
    let registry = AliasRegistry::open(&fixture.paths_path).unwrap();

    assert_eq!(registry.resolve_alias("proj").unwrap(), "/home/u/projects/demo");
    assert!(matches!(
        registry.resolve_alias("missing"),
        Err(ApiError::AliasNotFound(_))
    ));
}

#[test]
fn test_last_write_wins_across_instances() {
    let fixture = Fixture::new();
    let mut first = AliasRegistry::open(&fixture.paths_path).unwrap();
    let mut second = AliasRegistry::open(&fixture.paths_path).unwrap();

    first.set_alias("proj", "/a").unwrap();
    second.set_alias("proj", "/b").unwrap();

    first.reload().unwrap();
    assert_eq!(first.resolve_alias("proj").unwrap(), "/b");
    assert_eq!(first.list_aliases().len(), 1);
}

#[test]
fn test_targets_not_checked_on_write() {
    let fixture = Fixture::new();
    let mut registry = AliasRegistry::open(&fixture.paths_path).unwrap();
    registry.set_alias("ghost", "/no/such/dir").unwrap();
    assert_eq!(registry.resolve_alias("ghost").unwrap(), "/no/such/dir");
    assert!(!registry.check_aliases()[0].exists);
}

#[test]
fn test_path_plugin_uses_manager_aliases() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    manager
        .aliases_mut()
        .set_alias_with_description("docs", "/srv/docs", Some("team docs".to_string()))
        .unwrap();

    let outcome = manager
        .invoke(&["path".to_string()], &["docs".to_string()])
        .unwrap();
    assert_eq!(outcome, Outcome::ChangeDirectory(PathBuf::from("/srv/docs")));

    let reopened = AliasRegistry::open(&fixture.paths_path).unwrap();
    assert_eq!(
        reopened.get("docs").unwrap().description.as_deref(),
        Some("team docs")
    );
}
