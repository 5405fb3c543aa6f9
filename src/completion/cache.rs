//! TTL cache of resolved child-name lists keyed by structure path

use crate::completion::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::store::StructureStorage;
use crate::tree::path::{ancestor_keys, join_segments, parse_path, SEPARATOR};
use crate::tree::resolver::{list_children, resolve};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default time-to-live for cached completions.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    names: Vec<String>,
    captured_at: Instant,
}

/// Cache in front of the resolver
///
/// A miss reloads the structure document from storage, so any hit is at most
/// `ttl` old. Entries are keyed by the canonical `/`-joined path (root = `""`).
pub struct CompletionCache {
    storage: Arc<dyn StructureStorage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    loads: AtomicUsize,
}

impl CompletionCache {
    /// Create a cache using the system clock
    pub fn new(storage: Arc<dyn StructureStorage>, ttl: Duration) -> Self {
        Self::with_clock(storage, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock
    pub fn with_clock(
        storage: Arc<dyn StructureStorage>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            clock,
            ttl,
            entries: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Enabled child names of the node at `path_key`
    ///
    /// Never fails: a missing or corrupt document, or a path that does not
    /// resolve, yields an empty list. Failures are not cached.
    pub fn get_or_resolve(&self, path_key: &str) -> Vec<String> {
        let segments = parse_path(path_key);
        let key = join_segments(&segments);
        let now = self.clock.now();

        if let Some(entry) = self.entries.lock().get(&key) {
            if now.saturating_duration_since(entry.captured_at) < self.ttl {
                return entry.names.clone();
            }
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        let store = match self.storage.load() {
            Ok(store) => store,
            Err(e) => {
                self.report_load_failure(&e);
                return Vec::new();
            }
        };
        let names = match resolve(&store, &segments) {
            Ok(id) => list_children(&store, &id),
            Err(e) => {
                debug!(path = %key, error = %e, "Completion path did not resolve");
                return Vec::new();
            }
        };

        self.entries.lock().insert(
            key,
            CacheEntry {
                names: names.clone(),
                captured_at: now,
            },
        );
        names
    }

    /// Candidates for a partially typed path
    ///
    /// The text after the last `/` filters the cached children of the part
    /// before it by prefix.
    pub fn complete(&self, partial: &str) -> Vec<String> {
        let (typed, fragment) = match partial.rfind(SEPARATOR) {
            Some(pos) => (&partial[..pos], &partial[pos + 1..]),
            None => ("", partial),
        };
        let fragment = crate::tree::path::normalize_segment(fragment);
        self.get_or_resolve(typed)
            .into_iter()
            .filter(|name| name.starts_with(&fragment))
            .collect()
    }

    /// Drop the entry for `segments` and for every ancestor path
    pub fn invalidate<S: AsRef<str>>(&self, segments: &[S]) {
        let keys = ancestor_keys(segments);
        let mut entries = self.entries.lock();
        for key in &keys {
            entries.remove(key);
        }
        debug!(keys = ?keys, "Invalidated completion entries");
    }

    /// Drop the entries for `segments`, its ancestors, and everything below it
    pub fn invalidate_subtree<S: AsRef<str>>(&self, segments: &[S]) {
        self.invalidate(segments);
        let prefix = format!("{}{}", join_segments(segments), SEPARATOR);
        let mut entries = self.entries.lock();
        if segments.is_empty() {
            entries.clear();
        } else {
            entries.retain(|key, _| !key.starts_with(&prefix));
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Whether a fresh entry exists for `path_key`
    pub fn is_fresh(&self, path_key: &str) -> bool {
        let key = join_segments(&parse_path(path_key));
        let now = self.clock.now();
        self.entries
            .lock()
            .get(&key)
            .map(|entry| now.saturating_duration_since(entry.captured_at) < self.ttl)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of document loads performed so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn report_load_failure(&self, error: &StorageError) {
        match error {
            StorageError::DocumentMissing(path) => {
                debug!(path = %path.display(), "No structure document; no completions");
            }
            e if e.is_corrupt() => {
                warn!(error = %e, "Structure document is corrupt; completions disabled");
            }
            e => {
                warn!(error = %e, "Failed to read structure document for completion");
            }
        }
    }
}
