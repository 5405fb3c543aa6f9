//! Short-Name Registry
//!
//! Flat mapping from a short alias to an absolute filesystem path, persisted as
//! its own JSON document. Targets are not checked when written; consumers
//! report a missing directory when they try to use it.

use crate::error::{ApiError, StorageError};
use crate::store::write_atomic;
use crate::tree::path::validate_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// One alias target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasEntry {
    pub path: String,
    pub description: Option<String>,
    /// Every other key of the detailed form (`created_at`, `updated_at`, ...),
    /// written back unchanged.
    pub extra: BTreeMap<String, Value>,
}

impl AliasEntry {
    pub fn created_at(&self) -> Option<&str> {
        self.extra.get(CREATED_AT).and_then(Value::as_str)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.extra.get(UPDATED_AT).and_then(Value::as_str)
    }
}

/// On-disk form: a bare path string, or an object with a path and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AliasRecord {
    Plain(String),
    Detailed {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(flatten)]
        extra: BTreeMap<String, Value>,
    },
}

impl From<AliasRecord> for AliasEntry {
    fn from(record: AliasRecord) -> Self {
        match record {
            AliasRecord::Plain(path) => AliasEntry {
                path,
                ..AliasEntry::default()
            },
            AliasRecord::Detailed {
                path,
                description,
                extra,
            } => AliasEntry {
                path,
                description,
                extra,
            },
        }
    }
}

impl From<&AliasEntry> for AliasRecord {
    fn from(entry: &AliasEntry) -> Self {
        if entry.description.is_none() && entry.extra.is_empty() {
            return AliasRecord::Plain(entry.path.clone());
        }
        AliasRecord::Detailed {
            path: entry.path.clone(),
            description: entry.description.clone(),
            extra: entry.extra.clone(),
        }
    }
}

/// Local time in ISO-8601 form, matching the timestamps already found in alias documents
fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Result of checking one alias target on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasCheck {
    pub name: String,
    pub path: String,
    pub exists: bool,
}

/// Alias registry backed by a JSON document
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    path: PathBuf,
    aliases: BTreeMap<String, AliasEntry>,
}

impl AliasRegistry {
    /// Load the registry from `path`; a missing file is an empty registry
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StorageError> {
        let path = path.into();
        let aliases = Self::read(&path)?;
        Ok(Self { path, aliases })
    }

    fn read(path: &Path) -> Result<BTreeMap<String, AliasEntry>, StorageError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::IoError(e)),
        };
        let records: BTreeMap<String, AliasRecord> = serde_json::from_str(&text)
            .map_err(|e| StorageError::corrupt(path, format!("invalid alias document: {}", e)))?;
        debug!(path = %path.display(), aliases = records.len(), "Loaded alias document");
        Ok(records
            .into_iter()
            .map(|(name, record)| (name, record.into()))
            .collect())
    }

    /// Re-read the document, dropping any unsaved state
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.aliases = Self::read(&self.path)?;
        Ok(())
    }

    fn save(&self) -> Result<(), StorageError> {
        let records: BTreeMap<&str, AliasRecord> = self
            .aliases
            .iter()
            .map(|(name, entry)| (name.as_str(), AliasRecord::from(entry)))
            .collect();
        let mut serialized = serde_json::to_vec_pretty(&records).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("Failed to serialize alias document: {}", e),
            ))
        })?;
        serialized.push(b'\n');
        write_atomic(&self.path, &serialized)
    }

    pub fn document_path(&self) -> &Path {
        &self.path
    }

    /// Resolve a short name to its target path
    pub fn resolve_alias(&self, name: &str) -> Result<&str, ApiError> {
        self.aliases
            .get(name.trim())
            .map(|entry| entry.path.as_str())
            .ok_or_else(|| ApiError::AliasNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&AliasEntry> {
        self.aliases.get(name.trim())
    }

    /// Set or overwrite an alias and persist immediately (last write wins)
    ///
    /// New entries are stamped with `created_at`; overwrites keep the existing
    /// metadata and stamp `updated_at`.
    pub fn set_alias(&mut self, name: &str, path: &str) -> Result<(), ApiError> {
        self.set_alias_with_description(name, path, None)
    }

    pub fn set_alias_with_description(
        &mut self,
        name: &str,
        path: &str,
        description: Option<String>,
    ) -> Result<(), ApiError> {
        validate_name(name).map_err(ApiError::InvalidName)?;
        let name = name.trim().to_string();
        let entry = match self.aliases.get(&name) {
            Some(existing) => {
                let mut extra = existing.extra.clone();
                extra.insert(UPDATED_AT.to_string(), Value::String(timestamp()));
                AliasEntry {
                    path: path.to_string(),
                    description: description.or_else(|| existing.description.clone()),
                    extra,
                }
            }
            None => AliasEntry {
                path: path.to_string(),
                description,
                extra: BTreeMap::from([(CREATED_AT.to_string(), Value::String(timestamp()))]),
            },
        };
        let previous = self.aliases.insert(name.clone(), entry);
        if let Err(e) = self.save() {
            // Keep memory consistent with the untouched document.
            match previous {
                Some(entry) => self.aliases.insert(name, entry),
                None => self.aliases.remove(&name),
            };
            return Err(e.into());
        }
        Ok(())
    }

    /// Delete an alias and persist immediately
    pub fn remove_alias(&mut self, name: &str) -> Result<AliasEntry, ApiError> {
        let key = name.trim().to_string();
        let removed = self
            .aliases
            .remove(&key)
            .ok_or_else(|| ApiError::AliasNotFound(name.to_string()))?;
        if let Err(e) = self.save() {
            self.aliases.insert(key, removed);
            return Err(e.into());
        }
        Ok(removed)
    }

    /// Mapping of short name to target path, sorted by name
    pub fn list_aliases(&self) -> BTreeMap<String, String> {
        self.aliases
            .iter()
            .map(|(name, entry)| (name.clone(), entry.path.clone()))
            .collect()
    }

    /// Short names starting with `partial`, sorted; never touches the disk
    pub fn complete(&self, partial: &str) -> Vec<String> {
        let partial = partial.trim_start();
        self.aliases
            .keys()
            .filter(|name| name.starts_with(partial))
            .cloned()
            .collect()
    }

    pub fn entries(&self) -> &BTreeMap<String, AliasEntry> {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Report whether each alias target currently exists
    pub fn check_aliases(&self) -> Vec<AliasCheck> {
        self.aliases
            .iter()
            .map(|(name, entry)| AliasCheck {
                name: name.clone(),
                path: entry.path.clone(),
                exists: Path::new(&entry.path).exists(),
            })
            .collect()
    }
}

/// Turn user input into an absolute path without requiring it to exist
///
/// Expands a leading `~`, joins relative paths onto `cwd`, and canonicalizes
/// when the target exists.
pub fn absolutize(input: &str, cwd: &Path) -> PathBuf {
    let expanded = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            match directories::BaseDirs::new() {
                Some(dirs) => dirs.home_dir().join(rest.trim_start_matches('/')),
                None => PathBuf::from(input),
            }
        }
        _ => PathBuf::from(input),
    };
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    dunce::canonicalize(&joined).unwrap_or(joined)
}
