//! Port implementations shipped with the core.
//!
//! # Responsibility
//! - Provide an in-process backend for the CLI driver and integration tests.
//!
//! # Invariants
//! - Backends honor the port contracts exactly; they never touch screen state.

pub mod memory;
