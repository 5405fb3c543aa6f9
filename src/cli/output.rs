//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain/service errors to a single line for stderr.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StorageError::CorruptDocument { .. }) => {
            format!("{} (run `ddd reset` to rebuild it)", e)
        }
        ApiError::AliasNotFound(name) => {
            format!("No saved path named '{}' (see `ddd cd list`)", name)
        }
        _ => e.to_string(),
    }
}
