//! MCP tool modules.
//!
//! Tools are grouped by table: idea capture and lookup, the topic registry,
//! idea cross-references, and derived insights.

pub mod ideas;
pub mod insights;
pub mod relationships;
pub mod topics;
