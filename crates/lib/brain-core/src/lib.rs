//! Core types and services for the second brain.
//!
//! This crate owns the control plane behind every MCP tool (input
//! validation, defaulting, composition of store calls) and provides the
//! `SurrealDB` backing store implementation.

pub mod control;
pub mod store;
