//! Persistence layer for the Node Store
//!
//! The structure document is a JSON object keyed by node id. Writes go to a
//! temporary sibling file that is renamed over the target, so a concurrent
//! reader sees either the old or the new document, never a partial one.

use crate::error::StorageError;
use crate::store::NodeStore;
use crate::tree::node::Node;
use crate::types::NodeId;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage port for the structure document
pub trait StructureStorage: Send + Sync {
    /// Read and validate the document.
    fn load(&self) -> Result<NodeStore, StorageError>;

    /// Replace the document atomically.
    fn save(&self, store: &NodeStore) -> Result<(), StorageError>;
}

/// JSON file implementation of [`StructureStorage`]
#[derive(Debug, Clone)]
pub struct JsonStructureStorage {
    path: PathBuf,
}

impl JsonStructureStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Parse a document from text, attributing failures to `path`
    pub fn parse(path: &Path, text: &str) -> Result<NodeStore, StorageError> {
        let nodes: BTreeMap<NodeId, Node> = serde_json::from_str(text)
            .map_err(|e| StorageError::corrupt(path, format!("invalid JSON: {}", e)))?;
        NodeStore::from_nodes(nodes).map_err(|reason| StorageError::corrupt(path, reason))
    }
}

impl StructureStorage for JsonStructureStorage {
    fn load(&self) -> Result<NodeStore, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::DocumentMissing(self.path.clone()))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };
        let store = Self::parse(&self.path, &text)?;
        debug!(path = %self.path.display(), nodes = store.len(), "Loaded structure document");
        Ok(store)
    }

    fn save(&self, store: &NodeStore) -> Result<(), StorageError> {
        let mut serialized = serde_json::to_vec_pretty(store).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("Failed to serialize structure document: {}", e),
            ))
        })?;
        serialized.push(b'\n');
        write_atomic(&self.path, &serialized)?;
        debug!(path = %self.path.display(), nodes = store.len(), "Saved structure document");
        Ok(())
    }
}

/// Write `contents` to `path` atomically
///
/// Creates parent directories, writes `<path>.tmp`, then renames it over
/// `path`. On failure the previous file at `path` is untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create parent directory {:?}: {}", parent, e),
                ))
            })?;
        }
    }

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to write {:?}: {}", temp_path, e),
        ))
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to rename temp file to {:?}: {}", path, e),
        ))
    })?;

    Ok(())
}
