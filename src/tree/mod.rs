//! Structure Tree
//!
//! The page/plugin tree that drives navigation and completion. Nodes live in an
//! id-keyed arena (`store::NodeStore`); edges are ids, never owning pointers.

pub mod node;
pub mod path;
pub mod resolver;
pub mod seed;

pub use node::{NewNode, Node, NodeKind};
pub use resolver::{complete, list_child_nodes, list_children, path_of, resolve, ResolveError};
