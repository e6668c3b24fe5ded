use brain_core::control::LinkIdeasRequest;
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

/// Parameters for linking two ideas.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LinkIdeasParams {
    pub source_id: String,
    pub target_id: String,
    /// Free text such as `related`, `builds_on`, `contradicts`, `action_from`. Defaults to `related`.
    pub relationship_type: Option<String>,
    /// Why the two ideas connect. Defaults to empty.
    pub note: Option<String>,
}

/// Parameters for fetching linked ideas.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetRelatedIdeasParams {
    pub idea_id: String,
}

/// Parameters for removing a link.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RemoveRelationshipParams {
    pub relationship_id: String,
}

#[tool_router(router = tool_router_relationships, vis = "pub")]
impl<C: Connection> BrainMcp<C> {
    #[tool(
        description = "Create a directional link from source_id to target_id. Both ideas must exist.\n\nrelationship_type: free text, e.g. 'related', 'builds_on', 'contradicts', 'action_from'. Defaults to 'related'.\nnote: optional explanation of the connection."
    )]
    async fn link_ideas(
        &self,
        Parameters(params): Parameters<LinkIdeasParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let relationship = self
            .control
            .link_ideas(LinkIdeasRequest {
                source_id: params.source_id,
                target_id: params.target_id,
                relationship_type: params.relationship_type,
                note: params.note,
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(relationship)?]))
    }

    #[tool(
        description = "Fetch all ideas linked to a given idea, in both directions.\n\nEach entry is the relationship record plus `direction`. Forward entries (this idea is the source) embed the linked idea as `target`; reverse entries embed it as `source`. Forward entries come first."
    )]
    async fn get_related_ideas(
        &self,
        Parameters(params): Parameters<GetRelatedIdeasParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let related = self
            .control
            .get_related_ideas(&params.idea_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(related)?]))
    }

    #[tool(
        description = "Remove a link between two ideas. Returns the deleted relationship rows; an unknown id returns an empty list."
    )]
    async fn remove_relationship(
        &self,
        Parameters(params): Parameters<RemoveRelationshipParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let removed = self
            .control
            .remove_relationship(&params.relationship_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(removed)?]))
    }
}
