//! Tree Resolver
//!
//! Walks the node arena along name segments. Cost is O(depth × branching):
//! structure menus are shallow and hand-curated, so a linear scan of each
//! `children` list beats maintaining a name index.

use crate::store::NodeStore;
use crate::tree::node::Node;
use crate::tree::path::{normalize_segment, parse_path};
use crate::types::NodeId;
use thiserror::Error;

/// Why a path could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No child named `segment` under the node reached after `index` segments.
    #[error("no child named '{segment}' at segment {index}")]
    PathNotFound { index: usize, segment: String },
}

impl ResolveError {
    pub fn index(&self) -> usize {
        match self {
            ResolveError::PathNotFound { index, .. } => *index,
        }
    }
}

impl From<ResolveError> for crate::error::ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::PathNotFound { index, segment } => {
                crate::error::ApiError::PathNotFound { index, segment }
            }
        }
    }
}

/// Resolve name segments to a node id, starting at the root
///
/// For each segment the current node's `children` are scanned in order and the
/// first child whose name matches wins. Disabled nodes are still addressable.
pub fn resolve<S: AsRef<str>>(store: &NodeStore, segments: &[S]) -> Result<NodeId, ResolveError> {
    let mut current = NodeId::ROOT;
    for (index, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        current = store
            .child_by_name(&current, segment)
            .map(|child| child.id)
            .ok_or_else(|| ResolveError::PathNotFound {
                index,
                segment: normalize_segment(segment),
            })?;
    }
    Ok(current)
}

/// Enabled child nodes of `id`, in `children` order
pub fn list_child_nodes<'a>(store: &'a NodeStore, id: &NodeId) -> Vec<&'a Node> {
    let Some(node) = store.get(id) else {
        return Vec::new();
    };
    node.children
        .iter()
        .filter_map(|child_id| store.get(child_id))
        .filter(|child| child.enabled)
        .collect()
}

/// Names of the enabled children of `id`, in `children` order
pub fn list_children(store: &NodeStore, id: &NodeId) -> Vec<String> {
    list_child_nodes(store, id)
        .into_iter()
        .map(|child| child.name.clone())
        .collect()
}

/// Name segments from the root down to `id` (empty for the root)
pub fn path_of(store: &NodeStore, id: &NodeId) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = *id;
    while !current.is_root() {
        segments.push(store.get(&current)?.name.clone());
        current = store.parent_of(&current)?;
    }
    segments.reverse();
    Some(segments)
}

/// Candidates for the next segment of a partially typed path
///
/// Everything before the last `/` must resolve; the text after it is a prefix
/// filter over the enabled children. A trailing `/` (or empty input) lists
/// every enabled child.
pub fn complete(store: &NodeStore, partial: &str) -> Result<Vec<String>, ResolveError> {
    let (typed, fragment) = match partial.rfind(crate::tree::path::SEPARATOR) {
        Some(pos) => (&partial[..pos], &partial[pos + 1..]),
        None => ("", partial),
    };
    let parent = resolve(store, &parse_path(typed))?;
    let fragment = normalize_segment(fragment);
    Ok(list_children(store, &parent)
        .into_iter()
        .filter(|name| name.starts_with(&fragment))
        .collect())
}
