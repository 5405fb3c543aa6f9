//! Completion Cache
//!
//! Process-local, TTL-bounded cache of child-name lists in front of the tree
//! resolver. Shell completion goes through here and never sees an error.

pub mod cache;
pub mod clock;

pub use cache::{CompletionCache, DEFAULT_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
