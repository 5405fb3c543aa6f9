//! Shared test utilities for integration tests
//!
//! Temp config directories, scenario documents, and serialized access to the
//! environment variables that steer config resolution.

use ddd::alias::AliasRegistry;
use ddd::capability::CapabilityRegistry;
use ddd::completion::{CompletionCache, ManualClock};
use ddd::store::{JsonStructureStorage, StructureStorage};
use ddd::structure::StructureManager;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Two top-level entries, one disabled.
pub const SCENARIO_DOC: &str = r#"{
    "0": {"children": ["1", "2"]},
    "1": {"name": "path", "enabled": true},
    "2": {"name": "set", "enabled": false}
}"#;

/// Environment variables set for one test and restored on drop
pub struct EnvScope {
    saved: Vec<(String, Option<String>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvScope {
    pub fn new(vars: &[(&str, Option<&str>)]) -> Self {
        let guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved = vars
            .iter()
            .map(|(key, value)| {
                let previous = std::env::var(key).ok();
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
                (key.to_string(), previous)
            })
            .collect();
        Self {
            saved,
            _guard: guard,
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

/// A temp config directory with the structure and alias document paths
pub struct Fixture {
    pub dir: TempDir,
    pub structure_path: PathBuf,
    pub paths_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let structure_path = dir.path().join("structure.json");
        let paths_path = dir.path().join("paths.json");
        Self {
            dir,
            structure_path,
            paths_path,
        }
    }

    pub fn with_document(doc: &str) -> Self {
        let fixture = Self::new();
        std::fs::write(&fixture.structure_path, doc).unwrap();
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn storage(&self) -> Arc<dyn StructureStorage> {
        Arc::new(JsonStructureStorage::new(&self.structure_path))
    }

    pub fn manager(&self) -> StructureManager {
        StructureManager::open(
            self.storage(),
            Arc::new(CapabilityRegistry::with_builtins()),
            AliasRegistry::open(&self.paths_path).unwrap(),
        )
        .unwrap()
    }

    /// Manager sharing a manually driven completion cache
    pub fn manager_with_cache(&self, ttl: Duration) -> (StructureManager, Arc<CompletionCache>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(CompletionCache::with_clock(self.storage(), ttl, clock.clone()));
        let manager = self.manager().with_cache(cache.clone());
        (manager, cache, clock)
    }

    pub fn read_document(&self) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(&self.structure_path).unwrap()).unwrap()
    }
}
