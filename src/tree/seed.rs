//! Initial tree construction from capability declarations
//!
//! The root page's declared children are attached recursively: pages are
//! descended into, plugins are leaves. Declarations naming an unregistered
//! capability are skipped with a warning.

use crate::capability::{CapabilityRegistry, ChildDecl, Descriptor};
use crate::error::ApiError;
use crate::store::NodeStore;
use crate::tree::node::{NewNode, NodeKind};
use crate::types::NodeId;
use std::collections::HashSet;
use tracing::{info, warn};

/// Name of the page bound to the root node.
pub const ROOT_PAGE: &str = "home";

fn new_node_from(descriptor: Descriptor, decl: Option<&ChildDecl>) -> NewNode {
    NewNode {
        name: descriptor.name,
        kind: descriptor.kind,
        description: decl
            .and_then(|d| d.description.clone())
            .or(descriptor.description),
        display_name: descriptor.display_name,
        summary: descriptor.summary,
        category: descriptor.category,
        icon: descriptor.icon,
        enabled: true,
    }
}

/// Build a fresh store rooted at the `home` page
pub fn seed_structure(registry: &CapabilityRegistry) -> Result<NodeStore, ApiError> {
    let home = registry.get_or_error(NodeKind::Page, ROOT_PAGE)?;
    let root = new_node_from(home.describe(), None).into_node(NodeId::ROOT, 0);
    let mut store = NodeStore::with_root(root);

    let mut visiting = HashSet::new();
    visiting.insert(ROOT_PAGE.to_string());
    attach_declared_children(&mut store, registry, &NodeId::ROOT, &mut visiting)?;

    info!(nodes = store.len(), "Built initial structure tree");
    Ok(store)
}

/// Replace the children of a page node with its declared defaults
pub fn rescan(
    store: &mut NodeStore,
    registry: &CapabilityRegistry,
    id: &NodeId,
) -> Result<Vec<NodeId>, ApiError> {
    let node = store.get_or_error(id)?;
    if node.kind != NodeKind::Page {
        return Err(ApiError::InvalidOperation(format!(
            "node {} is a plugin; only pages can be rescanned",
            id
        )));
    }
    let page_name = node.name.clone();
    registry.get_or_error(NodeKind::Page, &page_name)?;

    let removed = store.clear_children(id)?;
    let mut visiting = HashSet::new();
    visiting.insert(page_name);
    attach_declared_children(store, registry, id, &mut visiting)?;
    Ok(removed)
}

fn attach_declared_children(
    store: &mut NodeStore,
    registry: &CapabilityRegistry,
    parent: &NodeId,
    visiting: &mut HashSet<String>,
) -> Result<(), ApiError> {
    let page_name = store.get_or_error(parent)?.name.clone();
    let Some(page) = registry.get_page(&page_name) else {
        return Ok(());
    };

    for decl in page.default_children() {
        let Some(capability) = registry.get(decl.kind, &decl.name) else {
            warn!(kind = %decl.kind, name = %decl.name, "Skipping undeclared capability");
            continue;
        };
        if decl.kind == NodeKind::Page && visiting.contains(&decl.name) {
            warn!(page = %decl.name, "Skipping recursive page declaration");
            continue;
        }

        let child_id = match store.insert_child(parent, new_node_from(capability.describe(), Some(&decl))) {
            Ok(id) => id,
            Err(ApiError::DuplicateName { name, .. }) => {
                warn!(parent = %parent, name = %name, "Skipping duplicate declared child");
                continue;
            }
            Err(e) => return Err(e),
        };

        if decl.kind == NodeKind::Page {
            visiting.insert(decl.name.clone());
            attach_declared_children(store, registry, &child_id, visiting)?;
            visiting.remove(&decl.name);
        }
    }
    Ok(())
}
