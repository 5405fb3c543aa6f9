//! Structure node definitions

use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What a node binds to: an interactive page or an executable plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Page,
    Plugin,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Page => "page",
            NodeKind::Plugin => "plugin",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(NodeKind::Page),
            "plugin" => Ok(NodeKind::Plugin),
            other => Err(format!("unknown node kind '{}' (expected page or plugin)", other)),
        }
    }
}

fn default_true() -> bool {
    true
}

/// One page or plugin slot in the structure tree.
///
/// Field order mirrors the persisted document. Fields the registry does not
/// understand are carried in `extra` so a load/save cycle never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Filled from the document key on load; the value copy is informational.
    #[serde(default)]
    pub id: NodeId,

    #[serde(rename = "type", default)]
    pub kind: NodeKind,

    /// Path segment. Only the root may leave it empty.
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default)]
    pub children: Vec<NodeId>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Node {
    /// Best label for humans: display name, then summary, then name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.summary.as_deref())
            .unwrap_or(&self.name)
    }
}

/// A node about to be attached under a parent. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    pub name: String,
    pub kind: NodeKind,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub enabled: bool,
}

impl NewNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            display_name: None,
            summary: None,
            category: None,
            icon: None,
            enabled: true,
        }
    }

    pub fn page(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Page)
    }

    pub fn plugin(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Plugin)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub(crate) fn into_node(self, id: NodeId, order: u32) -> Node {
        Node {
            id,
            kind: self.kind,
            name: self.name,
            display_name: self.display_name,
            description: self.description,
            summary: self.summary,
            category: self.category,
            icon: self.icon,
            children: Vec::new(),
            enabled: self.enabled,
            order: Some(order),
            extra: BTreeMap::new(),
        }
    }
}
