//! MCP server implementation for the second brain.
//!
//! This crate wires the control plane into rmcp tool handlers. Every tool
//! description is written to stand on its own: the agent may have no other
//! context than the catalog.

mod helpers;
mod tools;
pub mod server;

use brain_core::control::{BrainControlPlane, system_info};
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use surrealdb::Connection;

pub use tools::ideas::{
    AddIdeaParams,
    ArchiveIdeaParams,
    GetIdeaParams,
    ListByCategoryParams,
    SearchIdeasParams,
    UpdateIdeaParams,
};
pub use tools::insights::{AddInsightParams, ListInsightsParams, MarkActionedParams};
pub use tools::relationships::{GetRelatedIdeasParams, LinkIdeasParams, RemoveRelationshipParams};
pub use tools::topics::{AddTopicParams, ListTopicsParams, SearchTopicsParams};

const SERVER_INSTRUCTIONS: &str = r"Second Brain is a personal knowledge capture system. The user is often on a phone, so keep responses SHORT and conversational.

Workflow:
1. Call `get_system_info` first in a new conversation to learn the categories, tables and guidelines.
2. When the user mentions something worth keeping, offer to capture it with `add_idea`.
3. Find past notes with `search_ideas` (text, category, tags) or `list_by_category`.
4. Cross-reference with `link_ideas` / `get_related_ideas`, and record patterns with `add_insight`.

Notes:
- Categories: groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning.
- For cf_care entries always ask for a type (treatment, insurance, medication, or appointment) and store it in metadata.type.
- For religious_study or finance_journal, ask if it connects to past notes.
- Use tags liberally; `search_topics` and `list_topics` suggest existing ones.
- Always confirm writes succeeded. Never lose data: archive instead of deleting ideas.";

/// MCP server wrapper around the brain control plane and tool routers.
pub struct BrainMcp<C: Connection> {
    tool_router: ToolRouter<Self>,
    control: BrainControlPlane<C>,
}

impl<C: Connection> Clone for BrainMcp<C> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            control: self.control.clone(),
        }
    }
}

impl<C: Connection> BrainMcp<C> {
    /// Creates a new server over a control plane handle.
    #[must_use]
    pub fn new(control: BrainControlPlane<C>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_ideas()
            + Self::tool_router_topics()
            + Self::tool_router_relationships()
            + Self::tool_router_insights();
        Self {
            tool_router,
            control,
        }
    }

    #[must_use]
    pub const fn control(&self) -> &BrainControlPlane<C> {
        &self.control
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<C: Connection> BrainMcp<C> {
    #[tool(
        description = "Return the full layout of the second brain: available categories with their meaning, how ideas/tags/relationships/insights are stored, and behavioral guidelines. CALL THIS FIRST in any new conversation to orient yourself before doing anything else."
    )]
    async fn get_system_info(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(system_info())?]))
    }
}

#[tool_handler]
impl<C: Connection> ServerHandler for BrainMcp<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use brain_store::models::Category;
    use surrealdb::Surreal;
    use surrealdb::engine::local::{Db, Mem};

    use super::*;

    const CATEGORY_TOOLS: &[&str] = &[
        "add_idea",
        "search_ideas",
        "update_idea",
        "list_by_category",
        "add_topic",
        "list_topics",
        "add_insight",
        "list_insights",
    ];

    pub(crate) async fn build_server() -> BrainMcp<Db> {
        let db = Surreal::new::<Mem>(())
            .await
            .expect("failed to create in-memory surrealdb instance");
        db.use_ns("second_brain")
            .use_db("mcp")
            .await
            .expect("failed to select surrealdb namespace/db");
        let control = BrainControlPlane::new(db);
        control
            .store()
            .ensure_schema()
            .await
            .expect("schema should apply");
        BrainMcp::new(control)
    }

    #[tokio::test]
    async fn registers_every_tool() {
        let server = build_server().await;
        let names: BTreeSet<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        let expected: BTreeSet<String> = [
            "get_system_info",
            "add_idea",
            "search_ideas",
            "get_idea",
            "update_idea",
            "list_by_category",
            "archive_idea",
            "add_topic",
            "list_topics",
            "search_topics",
            "link_ideas",
            "get_related_ideas",
            "remove_relationship",
            "add_insight",
            "list_insights",
            "mark_actioned",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn category_tools_list_every_category() {
        let server = build_server().await;
        for tool in server.tool_router.list_all() {
            if !CATEGORY_TOOLS.contains(&&*tool.name) {
                continue;
            }
            let description = tool.description.as_deref().unwrap_or_default();
            for category in Category::ALL {
                assert!(
                    description.contains(category.as_str()),
                    "{} description is missing {category}",
                    tool.name
                );
            }
        }
    }

    #[tokio::test]
    async fn add_idea_description_explains_cf_care_type() {
        let server = build_server().await;
        let add_idea = server
            .tool_router
            .list_all()
            .into_iter()
            .find(|tool| tool.name == "add_idea")
            .expect("add_idea registered");
        let description = add_idea.description.as_deref().unwrap_or_default();
        for kind in ["treatment", "insurance", "medication", "appointment"] {
            assert!(description.contains(kind));
        }
    }
}
