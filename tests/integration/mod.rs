//! Integration tests for the ddd structure registry

mod alias_registry;
mod completion_cache;
mod config_dir;
mod structure_manager;
mod test_utils;
