use brain_store::models::{Category, Idea, IdeaPatch, Metadata, NewIdea};
use brain_store::schema::{DEFAULT_CATEGORY_LIMIT, SEARCH_RESULT_CAP};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::{debug, info, warn};

use crate::store::IdeaQuery;

use super::{
    BrainControlPlane,
    ControlError,
    ensure_non_empty,
    non_blank,
    normalize_tags,
    parse_category,
    parse_optional_category,
};

/// Input payload for capturing an idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddIdeaRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Filters for searching ideas. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIdeasRequest {
    pub query: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl<C: Connection> BrainControlPlane<C> {
    /// Captures a new idea.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for a blank title or unknown
    /// category, or `ControlError::Store` if the write fails.
    pub async fn add_idea(&self, request: AddIdeaRequest) -> Result<Idea, ControlError> {
        let AddIdeaRequest {
            title,
            content,
            category,
            tags,
            metadata,
        } = request;

        ensure_non_empty(&title, "title")?;
        let category = parse_category(&category)?;
        let metadata = metadata.unwrap_or_default();
        if category == Category::CfCare && !metadata.contains_key("type") {
            warn!(%title, "cf_care idea captured without metadata.type");
        }

        let idea = self
            .store
            .create_idea(NewIdea {
                title,
                content,
                category,
                tags: normalize_tags(tags),
                metadata,
            })
            .await?;
        info!(idea_id = %idea.id, category = %idea.category, "idea captured");
        Ok(idea)
    }

    /// Searches non-archived ideas, newest first, capped at 25 results.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for an unknown category filter, or
    /// `ControlError::Store` if the query fails.
    pub async fn search_ideas(&self, request: SearchIdeasRequest) -> Result<Vec<Idea>, ControlError> {
        let category = parse_optional_category(request.category.as_deref())?;
        let terms = non_blank(request.query.as_deref())
            .map(|query| query.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let query = IdeaQuery {
            terms,
            category,
            tags: normalize_tags(request.tags),
            include_archived: false,
            limit: SEARCH_RESULT_CAP,
        };
        debug!(?query, "searching ideas");
        Ok(self.store.query_ideas(query).await?)
    }

    /// Fetches an idea by id, archived or not.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if no idea has the id.
    pub async fn get_idea(&self, idea_id: &str) -> Result<Idea, ControlError> {
        ensure_non_empty(idea_id, "idea_id")?;
        self.store
            .get_idea(idea_id)
            .await?
            .ok_or_else(|| idea_not_found(idea_id))
    }

    /// Replaces only the named fields of an idea.
    ///
    /// Accepted keys are `title`, `content`, `category`, `tags`, and
    /// `metadata`; anything else is rejected. `null` values are ignored.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for unknown keys, an invalid
    /// category, or an empty field set; `ControlError::NotFound` if the idea
    /// does not exist.
    pub async fn update_idea(
        &self,
        idea_id: &str,
        fields: Metadata,
    ) -> Result<Idea, ControlError> {
        ensure_non_empty(idea_id, "idea_id")?;
        let mut patch: IdeaPatch = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|err| ControlError::Validation(err.to_string()))?;
        if patch.is_empty() {
            return Err(ControlError::Validation(
                "fields must name at least one of: title, content, category, tags, metadata"
                    .to_string(),
            ));
        }
        if let Some(title) = patch.title.as_deref() {
            ensure_non_empty(title, "title")?;
        }
        patch.tags = patch.tags.map(|tags| normalize_tags(Some(tags)));

        let idea = self
            .store
            .update_idea(idea_id, patch)
            .await?
            .ok_or_else(|| idea_not_found(idea_id))?;
        info!(idea_id = %idea.id, "idea updated");
        Ok(idea)
    }

    /// Lists the most recent non-archived ideas in a category.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for an unknown category, or
    /// `ControlError::Store` if the query fails.
    pub async fn list_by_category(
        &self,
        category: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Idea>, ControlError> {
        let category = parse_category(category)?;
        let limit = limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_CATEGORY_LIMIT);
        let query = IdeaQuery {
            category: Some(category),
            limit,
            ..IdeaQuery::default()
        };
        debug!(%category, limit, "listing ideas by category");
        Ok(self.store.query_ideas(query).await?)
    }

    /// Soft-deletes an idea. Archiving twice is a no-op.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the idea does not exist.
    pub async fn archive_idea(&self, idea_id: &str) -> Result<Idea, ControlError> {
        ensure_non_empty(idea_id, "idea_id")?;
        let idea = self
            .store
            .archive_idea(idea_id)
            .await?
            .ok_or_else(|| idea_not_found(idea_id))?;
        info!(idea_id = %idea.id, "idea archived");
        Ok(idea)
    }
}

fn idea_not_found(idea_id: &str) -> ControlError {
    ControlError::NotFound {
        entity: "idea",
        id: idea_id.to_string(),
    }
}
