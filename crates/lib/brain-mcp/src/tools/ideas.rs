use brain_core::control::{AddIdeaRequest, SearchIdeasRequest};
use brain_store::models::Metadata;
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

/// Parameters for capturing a new idea.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AddIdeaParams {
    /// Short headline for the idea.
    pub title: String,
    /// Full text of the note.
    pub content: String,
    /// One of: groceries, `religious_study`, `finance_journal`, `product_ideas`,
    /// `health_wellness`, `cf_care`, `cooking_recipes`, `business_learning`.
    pub category: String,
    /// Free-form keywords for cross-category discovery. Defaults to none.
    pub tags: Option<Vec<String>>,
    /// Optional JSON object. For `cf_care` include `{"type": "treatment|insurance|medication|appointment"}`.
    pub metadata: Option<Metadata>,
}

/// Parameters for searching ideas. All filters are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchIdeasParams {
    /// Words that must all appear in the title or content, ignoring case.
    pub query: Option<String>,
    /// Restrict to one category.
    pub category: Option<String>,
    /// Match ideas carrying any of these tags.
    pub tags: Option<Vec<String>>,
}

/// Parameters for fetching a single idea.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetIdeaParams {
    pub idea_id: String,
}

/// Parameters for a partial idea update.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateIdeaParams {
    pub idea_id: String,
    /// Only the keys present are changed: title, content, category, tags, metadata.
    pub fields: Metadata,
}

/// Parameters for browsing one category.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListByCategoryParams {
    pub category: String,
    /// Maximum ideas to return. Defaults to 20.
    pub limit: Option<usize>,
}

/// Parameters for archiving an idea.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ArchiveIdeaParams {
    pub idea_id: String,
}

#[tool_router(router = tool_router_ideas, vis = "pub")]
impl<C: Connection> BrainMcp<C> {
    #[tool(
        description = "Capture a new idea into the second brain.\n\ncategory MUST be one of: groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning\n\ntags: free-form list of keywords for cross-category discovery (e.g. [\"prayer\", \"healing\", \"insurance\"]). Defaults to an empty list.\nmetadata: optional JSON object, defaults to {}. For cf_care, MUST include {\"type\": \"treatment|insurance|medication|appointment\"}.\n\nReturns the saved idea with its generated id and created_at."
    )]
    async fn add_idea(
        &self,
        Parameters(params): Parameters<AddIdeaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let idea = self
            .control
            .add_idea(AddIdeaRequest {
                title: params.title,
                content: params.content,
                category: params.category,
                tags: params.tags,
                metadata: params.metadata,
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(idea)?]))
    }

    #[tool(
        description = "Search ideas by text, category, and/or tags. Archived ideas are never returned.\n\nquery: words matched case-insensitively against title and content; every word must appear.\ncategory (optional): one of groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning\ntags (optional): returns ideas carrying ANY of the given tags.\n\nResults are newest first, capped at 25. With no filters, returns the most recent ideas."
    )]
    async fn search_ideas(
        &self,
        Parameters(params): Parameters<SearchIdeasParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let ideas = self
            .control
            .search_ideas(SearchIdeasRequest {
                query: params.query,
                category: params.category,
                tags: params.tags,
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(ideas)?]))
    }

    #[tool(description = "Fetch a single idea by id, including archived ideas.")]
    async fn get_idea(
        &self,
        Parameters(params): Parameters<GetIdeaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let idea = self
            .control
            .get_idea(&params.idea_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(idea)?]))
    }

    #[tool(
        description = "Update an existing idea. Pass only the fields you want to change inside `fields`.\n\nAllowed keys: title, content, category, tags, metadata. Unknown keys are rejected.\ncategory must be one of: groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning\nmetadata and tags replace the stored values wholesale."
    )]
    async fn update_idea(
        &self,
        Parameters(params): Parameters<UpdateIdeaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let idea = self
            .control
            .update_idea(&params.idea_id, params.fields)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(idea)?]))
    }

    #[tool(
        description = "List recent non-archived ideas in one category, newest first.\n\ncategory: one of groceries, religious_study, finance_journal, product_ideas, health_wellness, cf_care, cooking_recipes, business_learning\nlimit: maximum results, defaults to 20."
    )]
    async fn list_by_category(
        &self,
        Parameters(params): Parameters<ListByCategoryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let ideas = self
            .control
            .list_by_category(&params.category, params.limit)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(ideas)?]))
    }

    #[tool(
        description = "Soft-delete an idea by setting is_archived = true. The idea stays retrievable by id but disappears from searches and listings. Archiving twice is harmless."
    )]
    async fn archive_idea(
        &self,
        Parameters(params): Parameters<ArchiveIdeaParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let idea = self
            .control
            .archive_idea(&params.idea_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(idea)?]))
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::tests::build_server;

    fn json_payload(result: &CallToolResult) -> Value {
        assert_eq!(result.content.len(), 1);
        let text = &result.content[0]
            .as_text()
            .expect("tool result should be text")
            .text;
        serde_json::from_str(text).expect("tool result should be JSON")
    }

    fn idea_params(title: &str, category: &str, tags: &[&str]) -> AddIdeaParams {
        AddIdeaParams {
            title: title.to_string(),
            content: format!("{title} notes"),
            category: category.to_string(),
            tags: Some(tags.iter().map(|tag| (*tag).to_string()).collect()),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn tool_errors_map_to_mcp_codes() {
        let server = build_server().await;

        let missing = server
            .get_idea(Parameters(GetIdeaParams {
                idea_id: "does-not-exist".to_string(),
            }))
            .await
            .expect_err("missing idea should fail");
        assert_eq!(missing.code, ErrorCode::RESOURCE_NOT_FOUND);

        let invalid = server
            .add_idea(Parameters(idea_params("Chores", "chores", &[])))
            .await
            .expect_err("unknown category should fail");
        assert_eq!(invalid.code, ErrorCode::INVALID_PARAMS);
        assert!(invalid.message.contains("groceries"));
    }

    #[tokio::test]
    async fn capture_and_fetch_through_tools() {
        let server = build_server().await;
        let mut milk = idea_params("Milk", "groceries", &["weekly-list"]);
        milk.metadata = json!({ "checked": false }).as_object().cloned();
        let created = server
            .add_idea(Parameters(milk))
            .await
            .expect("add_idea should succeed");
        assert_eq!(created.is_error, Some(false));
        let created = json_payload(&created);
        let idea_id = created["id"].as_str().expect("id should be a string");
        assert!(!idea_id.is_empty());

        server
            .add_idea(Parameters(idea_params("Pancakes", "cooking_recipes", &[])))
            .await
            .expect("add_idea should succeed");

        let listed = server
            .list_by_category(Parameters(ListByCategoryParams {
                category: "groceries".to_string(),
                limit: None,
            }))
            .await
            .expect("list_by_category should succeed");
        let listed = json_payload(&listed);
        let ideas = listed.as_array().expect("listing should be an array");
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0]["id"], json!(idea_id));
        assert_eq!(ideas[0]["title"], json!("Milk"));
        assert_eq!(ideas[0]["category"], json!("groceries"));
        assert_eq!(ideas[0]["tags"], json!(["weekly-list"]));
        assert_eq!(ideas[0]["metadata"], json!({ "checked": false }));
        assert_eq!(ideas[0]["is_archived"], json!(false));

        let fetched = server
            .get_idea(Parameters(GetIdeaParams {
                idea_id: idea_id.to_string(),
            }))
            .await
            .expect("get_idea should succeed");
        assert_eq!(json_payload(&fetched), created);
    }
}
