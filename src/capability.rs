//! Capability Registry
//!
//! Binds page and plugin names to their behavior. The structure tree only
//! stores identity; anything executable is looked up here by `(kind, name)`.
//! Instances are created lazily from registered factories and reused.

mod builtin;

pub use builtin::{EnvConfigPage, HomePage, PathPlugin, SetPlugin};

use crate::alias::AliasRegistry;
use crate::error::ApiError;
use crate::tree::node::NodeKind;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Static metadata a capability reports about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub kind: NodeKind,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            display_name: None,
            description: None,
            summary: None,
            category: None,
            icon: None,
        }
    }
}

/// A child a page declares when the tree is first built or rescanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildDecl {
    pub kind: NodeKind,
    pub name: String,
    pub description: Option<String>,
}

impl ChildDecl {
    pub fn page(name: &str) -> Self {
        Self {
            kind: NodeKind::Page,
            name: name.to_string(),
            description: None,
        }
    }

    pub fn plugin(name: &str) -> Self {
        Self {
            kind: NodeKind::Plugin,
            name: name.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// What the caller should do after an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show the children of the given structure path.
    Navigate(Vec<String>),
    /// Change the working directory to the given path.
    ChangeDirectory(PathBuf),
    /// Print a message.
    Message(String),
}

/// Read-only services available to an invoked capability
pub struct InvocationContext<'a> {
    pub aliases: &'a AliasRegistry,
    /// Structure path of the invoked node.
    pub path: &'a [String],
}

/// Uniform behavior surface for pages and plugins
pub trait Capability: Send + Sync {
    fn describe(&self) -> Descriptor;

    /// Children to attach beneath this capability's node when seeding.
    fn default_children(&self) -> Vec<ChildDecl> {
        Vec::new()
    }

    fn invoke(&self, ctx: &InvocationContext<'_>, args: &[String]) -> Result<Outcome, ApiError>;
}

type Factory = Box<dyn Fn() -> Arc<dyn Capability> + Send + Sync>;
type Key = (NodeKind, String);

/// Registry of capability factories and their lazily created instances
pub struct CapabilityRegistry {
    factories: HashMap<Key, Factory>,
    instances: Mutex<HashMap<Key, Arc<dyn Capability>>>,
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Create a registry preloaded with the built-in pages and plugins
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_factory(NodeKind::Page, "home", || Arc::new(HomePage));
        registry.register_factory(NodeKind::Page, "env_config", || Arc::new(EnvConfigPage));
        registry.register_factory(NodeKind::Plugin, "path", || Arc::new(PathPlugin));
        registry.register_factory(NodeKind::Plugin, "set", || Arc::new(SetPlugin));
        registry
    }

    /// Register a factory; the instance is built on first lookup
    pub fn register_factory<F>(&mut self, kind: NodeKind, name: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Capability> + Send + Sync + 'static,
    {
        let key = (kind, name.to_string());
        self.instances.lock().remove(&key);
        self.factories.insert(key, Box::new(factory));
    }

    /// Register a ready-made instance under its own descriptor
    pub fn register_instance(&mut self, capability: Arc<dyn Capability>) {
        let descriptor = capability.describe();
        let key = (descriptor.kind, descriptor.name);
        self.factories.remove(&key);
        self.instances.lock().insert(key, capability);
    }

    /// Look up (and lazily instantiate) a capability
    pub fn get(&self, kind: NodeKind, name: &str) -> Option<Arc<dyn Capability>> {
        let key = (kind, name.to_string());
        let mut instances = self.instances.lock();
        if let Some(existing) = instances.get(&key) {
            return Some(Arc::clone(existing));
        }
        let instance = (self.factories.get(&key)?)();
        instances.insert(key, Arc::clone(&instance));
        Some(instance)
    }

    /// Look up a capability or fail with `CapabilityNotFound`
    pub fn get_or_error(&self, kind: NodeKind, name: &str) -> Result<Arc<dyn Capability>, ApiError> {
        self.get(kind, name).ok_or_else(|| ApiError::CapabilityNotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        })
    }

    pub fn get_page(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.get(NodeKind::Page, name)
    }

    pub fn get_plugin(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.get(NodeKind::Plugin, name)
    }

    /// Sorted names registered for a kind
    pub fn names(&self, kind: NodeKind) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .keys()
            .chain(self.instances.lock().keys())
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
