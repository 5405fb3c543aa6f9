//! Error types for the DDD structure registry.

use crate::types::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Corrupt document {path:?}: {reason}")]
    CorruptDocument { path: PathBuf, reason: String },

    #[error("Document not found: {0:?}")]
    DocumentMissing(PathBuf),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StorageError::CorruptDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when the error means the document exists but cannot be trusted.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::CorruptDocument { .. })
    }
}

/// Errors surfaced by the structure manager and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Path not found: no child named '{segment}' at segment {index}")]
    PathNotFound { index: usize, segment: String },

    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    #[error("Duplicate name '{name}' under node {parent}")]
    DuplicateName { parent: NodeId, name: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("No {kind} registered with name '{name}'")]
    CapabilityNotFound { kind: String, name: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
