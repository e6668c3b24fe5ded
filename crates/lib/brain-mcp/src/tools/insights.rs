use brain_core::control::{AddInsightRequest, ListInsightsRequest};
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

/// Parameters for recording an insight.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AddInsightParams {
    pub title: String,
    pub summary: String,
    /// Ids of the ideas this insight was drawn from.
    pub related_idea_ids: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    /// A concrete next step. Omitted when empty.
    pub action_item: Option<String>,
}

/// Parameters for listing insights.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListInsightsParams {
    pub category: Option<String>,
    /// Only insights whose action item is still pending. Defaults to false.
    pub unactioned_only: Option<bool>,
}

/// Parameters for completing an insight's action item.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MarkActionedParams {
    pub insight_id: String,
}

#[tool_router(router = tool_router_insights, vis = "pub")]
impl<C: Connection> BrainMcp<C> {
    #[tool(
        description = "Record an insight: a pattern or actionable observation drawn from several ideas.\n\nUse this after analyzing multiple ideas to capture a meta-observation.\ncategory (optional): one of groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning\naction_item: a concrete next step the user should consider."
    )]
    async fn add_insight(
        &self,
        Parameters(params): Parameters<AddInsightParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let insight = self
            .control
            .add_insight(AddInsightRequest {
                title: params.title,
                summary: params.summary,
                related_idea_ids: params.related_idea_ids,
                tags: params.tags,
                category: params.category,
                action_item: params.action_item,
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(insight)?]))
    }

    #[tool(
        description = "List past insights newest first, optionally filtered.\n\ncategory: one of groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning\nunactioned_only: if true, only show insights with pending action items."
    )]
    async fn list_insights(
        &self,
        Parameters(params): Parameters<ListInsightsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let insights = self
            .control
            .list_insights(ListInsightsRequest {
                category: params.category,
                unactioned_only: params.unactioned_only.unwrap_or(false),
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(insights)?]))
    }

    #[tool(description = "Mark an insight's action item as completed. This cannot be undone.")]
    async fn mark_actioned(
        &self,
        Parameters(params): Parameters<MarkActionedParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let insight = self
            .control
            .mark_actioned(&params.insight_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(insight)?]))
    }
}
