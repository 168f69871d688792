//! Tag collection management for draft records.
//!
//! # Responsibility
//! - Assign sort ranks and reject duplicate labels.
//! - Remove tags by rank without re-ranking the survivors.
//!
//! # Invariants
//! - Collections are always ordered by ascending `sort_rank`.
//! - Ranks are unique within one collection and never compacted.

mod collection;

pub use collection::{TagCollection, TagError};
