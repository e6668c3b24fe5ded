//! Storage models and schema helpers for the second brain.
//!
//! This crate defines the canonical data model shared by the control plane,
//! the MCP tool layer, and storage backends.

pub mod models;
pub mod schema;

pub use models::*;
