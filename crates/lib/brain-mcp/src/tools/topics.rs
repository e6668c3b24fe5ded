use brain_core::control::AddTopicRequest;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::{BrainMcp, helpers};

/// Parameters for registering a topic.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AddTopicParams {
    /// Tag name. Must be unique.
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Parameters for listing topics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListTopicsParams {
    pub category: Option<String>,
}

/// Parameters for topic autocomplete.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchTopicsParams {
    /// Fragment matched anywhere in the topic name, ignoring case.
    pub query: String,
}

#[tool_router(router = tool_router_topics, vis = "pub")]
impl<C: Connection> BrainMcp<C> {
    #[tool(
        description = "Register a new topic/tag for autocomplete and discovery. Names are unique; registering an existing name fails.\n\ncategory (optional): one of groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning\nEmpty description or category are not stored."
    )]
    async fn add_topic(
        &self,
        Parameters(params): Parameters<AddTopicParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let topic = self
            .control
            .add_topic(AddTopicRequest {
                name: params.name,
                description: params.description,
                category: params.category,
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(topic)?]))
    }

    #[tool(
        description = "List all registered topics sorted by name, optionally filtered by category (groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning).\nUseful for suggesting tags when capturing new ideas."
    )]
    async fn list_topics(
        &self,
        Parameters(params): Parameters<ListTopicsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let topics = self
            .control
            .list_topics(params.category.as_deref())
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(topics)?]))
    }

    #[tool(description = "Search topics by partial name match, ignoring case. Use for tag autocomplete.")]
    async fn search_topics(
        &self,
        Parameters(params): Parameters<SearchTopicsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let topics = self
            .control
            .search_topics(&params.query)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(topics)?]))
    }
}
