//! Infinite listing: accumulated page state and load eligibility.
//!
//! # Responsibility
//! - Merge fetched pages into one growing listing (`RecordStore`).
//! - Decide when the next page may be requested and drop stale results
//!   (`PaginationController`).
//!
//! # Invariants
//! - At most one page fetch is in flight per listing screen.
//! - Results carrying an outdated generation never reach the store.

mod controller;
mod store;

pub use controller::{can_load_more, ListingContext, LoadOutcome, PaginationController};
pub use store::RecordStore;
