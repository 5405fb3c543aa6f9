//! ddd: Toolbox Structure Registry
//!
//! Persists the hierarchy of pages and plugins for the developer toolbox,
//! resolves name paths through it, serves cached shell completions, and keeps
//! a registry of short names for frequently used directories.

pub mod alias;
pub mod capability;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod structure;
pub mod tree;
pub mod types;
