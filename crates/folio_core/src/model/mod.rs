//! Domain records shared by the listing and form screens.
//!
//! # Responsibility
//! - Define the shapes exchanged with external collaborators.
//! - Keep screen state (`ListingState`, `DraftRecord`) free of transport details.
//!
//! # Invariants
//! - Records are plain data; all state transitions live in `listing`/`form`.

pub mod draft;
pub mod listing;
pub mod post;
pub mod tag;
