//! Structure Manager
//!
//! Orchestrates the node store, resolver, alias registry and completion cache
//! for the interactive application. Every operation re-reads the document so
//! edits made by another process are picked up; every mutation is written
//! atomically and invalidates the completion entries it affects.

use crate::alias::AliasRegistry;
use crate::capability::{Capability, CapabilityRegistry, InvocationContext, Outcome};
use crate::completion::CompletionCache;
use crate::error::{ApiError, StorageError};
use crate::store::{NodeStore, StoreStatistics, StructureStorage};
use crate::tree::node::{NewNode, Node};
use crate::tree::path::validate_name;
use crate::tree::resolver::{list_child_nodes, list_children, path_of, resolve};
use crate::tree::seed::{rescan, seed_structure};
use crate::types::NodeId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Facade over the structure tree for pages, plugins and the CLI
pub struct StructureManager {
    storage: Arc<dyn StructureStorage>,
    registry: Arc<CapabilityRegistry>,
    aliases: AliasRegistry,
    cache: Option<Arc<CompletionCache>>,
    store: NodeStore,
}

impl StructureManager {
    /// Load the structure document, seeding and saving it on first run
    ///
    /// A corrupt document is an error here; the caller decides whether to
    /// [`reset`](Self::reset) it.
    pub fn open(
        storage: Arc<dyn StructureStorage>,
        registry: Arc<CapabilityRegistry>,
        aliases: AliasRegistry,
    ) -> Result<Self, ApiError> {
        let store = match storage.load() {
            Ok(store) => store,
            Err(StorageError::DocumentMissing(path)) => {
                info!(path = %path.display(), "No structure document, building initial tree");
                let store = seed_structure(&registry)?;
                storage.save(&store)?;
                store
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            storage,
            registry,
            aliases,
            cache: None,
            store,
        })
    }

    /// Attach a completion cache that mutations keep coherent
    pub fn with_cache(mut self, cache: Arc<CompletionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<CompletionCache>> {
        self.cache.as_ref()
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn aliases_mut(&mut self) -> &mut AliasRegistry {
        &mut self.aliases
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Snapshot as of the last operation
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Re-read the document from storage
    pub fn refresh(&mut self) -> Result<&NodeStore, ApiError> {
        self.store = self.storage.load()?;
        Ok(&self.store)
    }

    /// Persist `next` and make it current; on failure nothing changes.
    fn commit(&mut self, next: NodeStore) -> Result<(), ApiError> {
        self.storage.save(&next)?;
        self.store = next;
        Ok(())
    }

    fn invalidate(&self, segments: &[String]) {
        if let Some(cache) = &self.cache {
            cache.invalidate(segments);
        }
    }

    fn invalidate_subtree(&self, segments: &[String]) {
        if let Some(cache) = &self.cache {
            cache.invalidate_subtree(segments);
        }
    }

    fn segments_of(&self, id: &NodeId) -> Result<Vec<String>, ApiError> {
        path_of(&self.store, id).ok_or(ApiError::NodeNotFound(*id))
    }

    // ===== Queries =====

    pub fn get_node(&mut self, id: &NodeId) -> Result<Node, ApiError> {
        self.refresh()?;
        self.store.get_or_error(id).cloned()
    }

    /// All children of `id`, disabled ones included, in display order
    pub fn get_child_nodes(&mut self, id: &NodeId) -> Result<Vec<Node>, ApiError> {
        self.refresh()?;
        let node = self.store.get_or_error(id)?;
        Ok(node
            .children
            .iter()
            .filter_map(|child| self.store.get(child).cloned())
            .collect())
    }

    /// Enabled children of `id` in display order
    pub fn get_enabled_children(&mut self, id: &NodeId) -> Result<Vec<Node>, ApiError> {
        self.refresh()?;
        self.store.get_or_error(id)?;
        Ok(list_child_nodes(&self.store, id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Names of the enabled children of `id`
    pub fn completions_for_node(&mut self, id: &NodeId) -> Result<Vec<String>, ApiError> {
        self.refresh()?;
        self.store.get_or_error(id)?;
        Ok(list_children(&self.store, id))
    }

    pub fn resolve_path<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<NodeId, ApiError> {
        self.refresh()?;
        Ok(resolve(&self.store, segments)?)
    }

    pub fn find_node_by_path<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<Node, ApiError> {
        let id = self.resolve_path(segments)?;
        self.store.get_or_error(&id).cloned()
    }

    /// Name segments from the root to `id`
    pub fn path_of(&mut self, id: &NodeId) -> Result<Vec<String>, ApiError> {
        self.refresh()?;
        self.segments_of(id)
    }

    pub fn statistics(&mut self) -> Result<StoreStatistics, ApiError> {
        self.refresh()?;
        Ok(self.store.statistics())
    }

    /// Indented outline of the whole tree, disabled nodes marked
    pub fn render_tree(&mut self) -> Result<String, ApiError> {
        self.refresh()?;
        let mut lines = Vec::new();
        let mut stack = vec![(NodeId::ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.store.get(&id) else {
                continue;
            };
            let marker = if node.enabled { "+" } else { "-" };
            lines.push(format!(
                "{}{} {} [{}] ({})",
                "  ".repeat(depth),
                marker,
                node.label(),
                node.kind,
                id
            ));
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        Ok(lines.join("\n"))
    }

    // ===== Mutations =====

    /// Enable a node; returns whether anything changed
    pub fn enable(&mut self, id: &NodeId) -> Result<bool, ApiError> {
        self.set_enabled(id, true)
    }

    /// Disable a node; it stays in the store but is hidden from listings
    pub fn disable(&mut self, id: &NodeId) -> Result<bool, ApiError> {
        self.set_enabled(id, false)
    }

    fn set_enabled(&mut self, id: &NodeId, enabled: bool) -> Result<bool, ApiError> {
        self.refresh()?;
        if self.store.get_or_error(id)?.enabled == enabled {
            debug!(node = %id, enabled, "Enabled state unchanged");
            return Ok(false);
        }
        let segments = self.segments_of(id)?;

        let mut next = self.store.clone();
        if let Some(node) = next.get_mut(id) {
            node.enabled = enabled;
        }
        self.commit(next)?;
        self.invalidate(&segments);
        info!(node = %id, enabled, "Updated node enabled state");
        Ok(true)
    }

    /// Enable or disable the child of `parent` named `child_name`
    pub fn set_child_enabled(
        &mut self,
        parent: &NodeId,
        child_name: &str,
        enabled: bool,
    ) -> Result<bool, ApiError> {
        self.refresh()?;
        let child = self.child_id(parent, child_name)?;
        self.set_enabled(&child, enabled)
    }

    /// Attach a new node as the last child of `parent`
    pub fn add_node(&mut self, parent: &NodeId, node: NewNode) -> Result<NodeId, ApiError> {
        validate_name(&node.name).map_err(ApiError::InvalidName)?;
        self.refresh()?;
        let mut segments = self.segments_of(parent)?;

        let mut next = self.store.clone();
        let id = next.insert_child(parent, node)?;
        if let Some(created) = next.get(&id) {
            segments.push(created.name.clone());
        }
        self.commit(next)?;
        self.invalidate(&segments);
        info!(node = %id, parent = %parent, "Added node");
        Ok(id)
    }

    /// Remove `id` and its whole subtree; returns every removed id
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Vec<NodeId>, ApiError> {
        self.refresh()?;
        let segments = self.segments_of(id)?;

        let mut next = self.store.clone();
        let removed = next.remove_subtree(id)?;
        self.commit(next)?;
        self.invalidate_subtree(&segments);
        info!(node = %id, removed = removed.len(), "Removed subtree");
        Ok(removed)
    }

    /// Remove the child of `parent` named `child_name` and its subtree
    pub fn remove_child(&mut self, parent: &NodeId, child_name: &str) -> Result<Vec<NodeId>, ApiError> {
        self.refresh()?;
        let child = self.child_id(parent, child_name)?;
        self.remove_node(&child)
    }

    /// Move the named children of `parent` to the front in the given order
    pub fn reorder_children(&mut self, parent: &NodeId, ordered_names: &[String]) -> Result<(), ApiError> {
        self.refresh()?;
        let segments = self.segments_of(parent)?;
        for name in ordered_names {
            if self.store.child_by_name(parent, name).is_none() {
                warn!(parent = %parent, name = %name, "Ignoring unknown child in reorder");
            }
        }

        let mut next = self.store.clone();
        next.reorder_children(parent, ordered_names)?;
        self.commit(next)?;
        self.invalidate(&segments);
        Ok(())
    }

    /// Replace a page's children with the defaults its capability declares
    pub fn rescan_node(&mut self, id: &NodeId) -> Result<Vec<NodeId>, ApiError> {
        self.refresh()?;
        let segments = self.segments_of(id)?;

        let mut next = self.store.clone();
        let removed = rescan(&mut next, &self.registry, id)?;
        self.commit(next)?;
        self.invalidate_subtree(&segments);
        info!(node = %id, "Rescanned node");
        Ok(removed)
    }

    /// Discard the current document and rebuild it from capability declarations
    pub fn reset(&mut self) -> Result<(), ApiError> {
        let fresh = seed_structure(&self.registry)?;
        self.commit(fresh)?;
        if let Some(cache) = &self.cache {
            cache.clear();
        }
        warn!("Structure tree reset to defaults");
        Ok(())
    }

    fn child_id(&self, parent: &NodeId, child_name: &str) -> Result<NodeId, ApiError> {
        self.store.get_or_error(parent)?;
        self.store
            .child_by_name(parent, child_name)
            .map(|child| child.id)
            .ok_or_else(|| ApiError::PathNotFound {
                index: 0,
                segment: child_name.to_string(),
            })
    }

    // ===== Behavior binding =====

    pub fn get_page(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.registry.get_page(name)
    }

    pub fn get_plugin(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.registry.get_plugin(name)
    }

    /// Capability bound to the node at `segments`
    pub fn capability_for<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<Arc<dyn Capability>, ApiError> {
        let node = self.find_node_by_path(segments)?;
        self.registry.get_or_error(node.kind, &node.name)
    }

    /// Invoke the behavior bound to the node at `segments`
    pub fn invoke(&mut self, segments: &[String], args: &[String]) -> Result<Outcome, ApiError> {
        let node = self.find_node_by_path(segments)?;
        if !node.enabled {
            return Err(ApiError::InvalidOperation(format!(
                "'{}' is disabled",
                segments.join("/")
            )));
        }
        let capability = self.registry.get_or_error(node.kind, &node.name)?;
        let ctx = InvocationContext {
            aliases: &self.aliases,
            path: segments,
        };
        capability.invoke(&ctx, args)
    }
}
