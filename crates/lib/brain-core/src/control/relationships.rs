use brain_store::models::{IdeaRelationship, NewRelationship, RelatedIdea};
use brain_store::schema::DEFAULT_RELATIONSHIP_TYPE;
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::{debug, info};

use super::{BrainControlPlane, ControlError, ensure_non_empty, non_blank_owned};

/// Input payload for linking two ideas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkIdeasRequest {
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: Option<String>,
    pub note: Option<String>,
}

impl<C: Connection> BrainControlPlane<C> {
    /// Creates a directed edge from `source_id` to `target_id`.
    ///
    /// Endpoint existence is left to the store.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for blank ids, or
    /// `ControlError::Store` if the store rejects the edge.
    pub async fn link_ideas(
        &self,
        request: LinkIdeasRequest,
    ) -> Result<IdeaRelationship, ControlError> {
        let LinkIdeasRequest {
            source_id,
            target_id,
            relationship_type,
            note,
        } = request;
        ensure_non_empty(&source_id, "source_id")?;
        ensure_non_empty(&target_id, "target_id")?;
        let relationship_type = non_blank_owned(relationship_type)
            .unwrap_or_else(|| DEFAULT_RELATIONSHIP_TYPE.to_string());

        let relationship = self
            .store
            .create_relationship(NewRelationship {
                source_id,
                target_id,
                relationship_type,
                note: note.unwrap_or_default(),
            })
            .await?;
        info!(
            relationship_id = %relationship.id,
            source_id = %relationship.source_id,
            target_id = %relationship.target_id,
            "ideas linked"
        );
        Ok(relationship)
    }

    /// Returns every edge touching the idea: forward edges (target embedded)
    /// followed by reverse edges (source embedded).
    ///
    /// # Errors
    /// Returns `ControlError::Store` if either query fails.
    pub async fn get_related_ideas(&self, idea_id: &str) -> Result<Vec<RelatedIdea>, ControlError> {
        ensure_non_empty(idea_id, "idea_id")?;
        let mut related = self.store.related_from(idea_id).await?;
        let reverse = self.store.related_to(idea_id).await?;
        debug!(
            idea_id,
            forward = related.len(),
            reverse = reverse.len(),
            "related ideas fetched"
        );
        related.extend(reverse);
        Ok(related)
    }

    /// Hard-deletes an edge. Unknown ids succeed with an empty result.
    ///
    /// # Errors
    /// Returns `ControlError::Store` if the delete fails.
    pub async fn remove_relationship(
        &self,
        relationship_id: &str,
    ) -> Result<Vec<IdeaRelationship>, ControlError> {
        ensure_non_empty(relationship_id, "relationship_id")?;
        let removed = self.store.delete_relationship(relationship_id).await?;
        info!(relationship_id, removed = removed.len(), "relationship removed");
        Ok(removed)
    }
}
