//! Node Store
//!
//! Id-keyed arena holding every structure node. Parent→child edges are ids in
//! each node's `children` list, so deletion is a pure data operation.
//! Persistence lives in [`persistence`]; this layer never caches.

pub mod persistence;

pub use persistence::{write_atomic, JsonStructureStorage, StructureStorage};

use crate::error::ApiError;
use crate::tree::node::{NewNode, Node, NodeKind};
use crate::tree::path::{normalize_segment, validate_name};
use crate::types::NodeId;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// The structure tree as an arena of nodes keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NodeStore {
    nodes: BTreeMap<NodeId, Node>,
}

/// Aggregate counts over the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    pub nodes: usize,
    pub pages: usize,
    pub plugins: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub unreachable: usize,
    pub max_depth: usize,
}

impl NodeStore {
    /// Create a store holding only the given root node (its id is forced to `0`).
    pub fn with_root(mut root: Node) -> Self {
        root.id = NodeId::ROOT;
        root.children.clear();
        let mut nodes = BTreeMap::new();
        nodes.insert(NodeId::ROOT, root);
        Self { nodes }
    }

    /// Build a store from raw document nodes, enforcing the tree invariants
    ///
    /// Each node's `id` is taken from its key. Fails with a human-readable
    /// reason when the root is missing, a child id dangles, a node has more
    /// than one parent, the edges form a cycle, or sibling names collide.
    pub fn from_nodes(mut nodes: BTreeMap<NodeId, Node>) -> Result<Self, String> {
        for (id, node) in nodes.iter_mut() {
            node.id = *id;
        }
        let store = Self { nodes };
        store.validate()?;
        Ok(store)
    }

    /// Check every structural invariant of the arena
    pub fn validate(&self) -> Result<(), String> {
        if !self.nodes.contains_key(&NodeId::ROOT) {
            return Err("missing root node \"0\"".to_string());
        }

        let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
        for (id, node) in &self.nodes {
            if !id.is_root() && normalize_segment(&node.name).is_empty() {
                return Err(format!("node {} has an empty name", id));
            }

            let mut sibling_names = HashSet::new();
            for child_id in &node.children {
                let child = self.nodes.get(child_id).ok_or_else(|| {
                    format!("node {} references missing child {}", id, child_id)
                })?;
                if child_id.is_root() {
                    return Err(format!("node {} lists the root as a child", id));
                }
                if let Some(previous) = parents.insert(*child_id, *id) {
                    return Err(format!(
                        "node {} has more than one parent ({} and {})",
                        child_id, previous, id
                    ));
                }
                if !sibling_names.insert(normalize_segment(&child.name)) {
                    return Err(format!(
                        "duplicate child name '{}' under node {}",
                        child.name, id
                    ));
                }
            }
        }

        // With at most one parent per node, a cycle is a parent chain that
        // never reaches a parentless node.
        let mut settled: HashSet<NodeId> = HashSet::new();
        for start in self.nodes.keys() {
            let mut chain = Vec::new();
            let mut on_chain = HashSet::new();
            let mut current = *start;
            loop {
                if settled.contains(&current) {
                    break;
                }
                if !on_chain.insert(current) {
                    return Err(format!("cycle detected through node {}", current));
                }
                chain.push(current);
                match parents.get(&current) {
                    Some(parent) => current = *parent,
                    None => break,
                }
            }
            settled.extend(chain);
        }

        Ok(())
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Get a node or fail with `NodeNotFound`
    pub fn get_or_error(&self, id: &NodeId) -> Result<&Node, ApiError> {
        self.get(id).ok_or(ApiError::NodeNotFound(*id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> &Node {
        // Construction paths guarantee the root exists.
        &self.nodes[&NodeId::ROOT]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Next free id: one past the largest id in the arena
    ///
    /// Fails when the largest id is already `u64::MAX`; ids are never reused.
    pub fn next_id(&self) -> Result<NodeId, ApiError> {
        match self.nodes.keys().next_back() {
            None => Ok(NodeId(1)),
            Some(last) => last.next().ok_or_else(|| {
                ApiError::InvalidOperation(format!("no node id left after {}", last))
            }),
        }
    }

    /// Find the parent of a node (the root has none)
    pub fn parent_of(&self, id: &NodeId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.children.contains(id))
            .map(|(parent_id, _)| *parent_id)
    }

    fn parent_map(&self) -> HashMap<NodeId, NodeId> {
        self.nodes
            .iter()
            .flat_map(|(parent, node)| node.children.iter().map(move |child| (*child, *parent)))
            .collect()
    }

    /// Find a direct child of `parent` by name, first match in `children` order
    pub fn child_by_name(&self, parent: &NodeId, name: &str) -> Option<&Node> {
        let wanted = normalize_segment(name);
        self.nodes.get(parent)?.children.iter().find_map(|child_id| {
            self.nodes
                .get(child_id)
                .filter(|child| normalize_segment(&child.name) == wanted)
        })
    }

    /// Attach a new node as the last child of `parent`
    pub fn insert_child(&mut self, parent: &NodeId, node: NewNode) -> Result<NodeId, ApiError> {
        validate_name(&node.name).map_err(ApiError::InvalidName)?;
        if !self.contains(parent) {
            return Err(ApiError::NodeNotFound(*parent));
        }
        if self.child_by_name(parent, &node.name).is_some() {
            return Err(ApiError::DuplicateName {
                parent: *parent,
                name: node.name,
            });
        }

        let id = self.next_id()?;
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or(ApiError::NodeNotFound(*parent))?;
        let order = parent_node.children.len() as u32;
        parent_node.children.push(id);

        let mut new_node = node.into_node(id, order);
        new_node.name = normalize_segment(&new_node.name);
        self.nodes.insert(id, new_node);
        Ok(id)
    }

    /// All descendants of `id` in depth-first pre-order (excluding `id`)
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(id) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Cascade-delete `id` and its whole subtree
    ///
    /// Detaches `id` from its parent's `children` and returns every removed id
    /// (`id` first). The root cannot be removed.
    pub fn remove_subtree(&mut self, id: &NodeId) -> Result<Vec<NodeId>, ApiError> {
        if id.is_root() {
            return Err(ApiError::InvalidOperation(
                "the root node cannot be removed".to_string(),
            ));
        }
        if !self.contains(id) {
            return Err(ApiError::NodeNotFound(*id));
        }

        if let Some(parent) = self.parent_of(id) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|child| child != id);
            }
        }

        let mut removed = vec![*id];
        removed.extend(self.descendants(id));
        for node_id in &removed {
            self.nodes.remove(node_id);
        }
        Ok(removed)
    }

    /// Remove every child subtree of `id`, keeping `id` itself
    pub fn clear_children(&mut self, id: &NodeId) -> Result<Vec<NodeId>, ApiError> {
        let children = self.get_or_error(id)?.children.clone();
        let mut removed = Vec::new();
        for child in children {
            removed.extend(self.remove_subtree(&child)?);
        }
        Ok(removed)
    }

    /// Reorder the children of `parent`
    ///
    /// Children named in `ordered_names` move to the front in that order;
    /// the rest keep their relative order after them. Unknown names are ignored.
    pub fn reorder_children(
        &mut self,
        parent: &NodeId,
        ordered_names: &[String],
    ) -> Result<(), ApiError> {
        let current = self.get_or_error(parent)?.children.clone();
        let mut front = Vec::new();
        for name in ordered_names {
            if let Some(child) = self.child_by_name(parent, name) {
                if !front.contains(&child.id) {
                    front.push(child.id);
                }
            }
        }
        let rest: Vec<NodeId> = current
            .iter()
            .filter(|id| !front.contains(id))
            .copied()
            .collect();
        let reordered: Vec<NodeId> = front.into_iter().chain(rest).collect();

        for (position, child_id) in reordered.iter().enumerate() {
            if let Some(child) = self.nodes.get_mut(child_id) {
                child.order = Some(position as u32);
            }
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children = reordered;
        }
        Ok(())
    }

    pub fn statistics(&self) -> StoreStatistics {
        let mut stats = StoreStatistics {
            nodes: self.nodes.len(),
            ..StoreStatistics::default()
        };
        let reachable: HashSet<NodeId> = std::iter::once(NodeId::ROOT)
            .chain(self.descendants(&NodeId::ROOT))
            .collect();

        for (id, node) in &self.nodes {
            match node.kind {
                NodeKind::Page => stats.pages += 1,
                NodeKind::Plugin => stats.plugins += 1,
            }
            if node.enabled {
                stats.enabled += 1;
            } else {
                stats.disabled += 1;
            }
            if !reachable.contains(id) {
                stats.unreachable += 1;
            }
        }
        let parents = self.parent_map();
        stats.max_depth = reachable
            .iter()
            .filter_map(|id| depth_in(&parents, id))
            .max()
            .unwrap_or(0);
        stats
    }
}

/// Depth of `id` below the root (root = 0), `None` if unreachable
fn depth_in(parents: &HashMap<NodeId, NodeId>, id: &NodeId) -> Option<usize> {
    let mut depth = 0;
    let mut current = *id;
    while !current.is_root() {
        current = *parents.get(&current)?;
        depth += 1;
        // A cycle never reaches the root.
        if depth > parents.len() {
            return None;
        }
    }
    Some(depth)
}
