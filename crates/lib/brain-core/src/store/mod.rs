//! Store interfaces and `SurrealDB` implementation.
//!
//! The store layer owns persistence of ideas, topics, relationships, and
//! insights, including id and timestamp assignment.

pub mod surreal;

pub use surreal::{IdeaQuery, StoreError, StoreResult, SurrealBrainStore};
