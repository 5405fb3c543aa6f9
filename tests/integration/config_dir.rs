//! Config directory resolution and layered settings through the CLI context

use super::test_utils::EnvScope;
use ddd::cli::RunContext;
use ddd::config::{ConfigDirSource, CONFIG_DIR_ENV, LOCAL_DIR_NAME};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_override_beats_environment() {
    let temp = TempDir::new().unwrap();
    let env_dir = temp.path().join("from_env");
    let _env = EnvScope::new(&[
        (CONFIG_DIR_ENV, env_dir.to_str()),
        ("XDG_CONFIG_HOME", temp.path().join("xdg").to_str()),
    ]);

    let ctx = RunContext::with_cwd(Some(temp.path().join("explicit")), temp.path().to_path_buf())
        .unwrap();
    assert_eq!(ctx.config_dir().source, ConfigDirSource::Explicit);
    assert_eq!(ctx.config_dir().path, temp.path().join("explicit"));

    let ctx = RunContext::with_cwd(None, temp.path().to_path_buf()).unwrap();
    assert_eq!(ctx.config_dir().source, ConfigDirSource::Environment);
    assert_eq!(ctx.config_dir().path, env_dir);
}

#[test]
fn test_environment_beats_project_local() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(LOCAL_DIR_NAME)).unwrap();
    let env_dir = temp.path().join("from_env");
    let _env = EnvScope::new(&[
        (CONFIG_DIR_ENV, env_dir.to_str()),
        ("XDG_CONFIG_HOME", temp.path().join("xdg").to_str()),
    ]);

    let ctx = RunContext::with_cwd(None, temp.path().to_path_buf()).unwrap();
    assert_eq!(ctx.config_dir().path, env_dir);
}

#[test]
fn test_project_local_beats_home() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let project = temp.path().join("project");
    let nested = project.join("src").join("deep");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&nested).unwrap();
    let _env = EnvScope::new(&[
        (CONFIG_DIR_ENV, None),
        ("HOME", home.to_str()),
        ("XDG_CONFIG_HOME", temp.path().join("xdg").to_str()),
    ]);

    let ctx = RunContext::with_cwd(None, project.clone()).unwrap();
    assert_eq!(ctx.config_dir().source, ConfigDirSource::Home);
    assert_eq!(ctx.config_dir().path, home.join(".ddd_toolbox"));

    fs::create_dir(project.join(LOCAL_DIR_NAME)).unwrap();
    let ctx = RunContext::with_cwd(None, nested).unwrap();
    assert_eq!(ctx.config_dir().source, ConfigDirSource::ProjectLocal);
    assert_eq!(ctx.config_dir().path, project.join(LOCAL_DIR_NAME));
}

#[test]
fn test_config_dir_settings_applied() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("cfg");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[completion]\nttl_secs = 5\n\n[storage]\nstructure_file = \"tree.json\"\n",
    )
    .unwrap();
    let _env = EnvScope::new(&[
        ("XDG_CONFIG_HOME", temp.path().join("xdg").to_str()),
        ("DDD__COMPLETION__TTL_SECS", None),
    ]);

    let ctx = RunContext::with_cwd(Some(config_dir.clone()), temp.path().to_path_buf()).unwrap();
    assert_eq!(ctx.config().completion.ttl_secs, 5);

    ctx.open_manager().unwrap();
    assert!(config_dir.join("tree.json").exists());
    assert!(!config_dir.join("structure.json").exists());
}
