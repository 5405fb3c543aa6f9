//! Property-based tests for the structure tree

mod determinism;
