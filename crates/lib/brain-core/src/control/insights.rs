use brain_store::models::{Insight, NewInsight};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::info;

use super::{
    BrainControlPlane,
    ControlError,
    ensure_non_empty,
    non_blank_owned,
    normalize_tags,
    parse_optional_category,
};

/// Input payload for recording an insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddInsightRequest {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub related_idea_ids: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub action_item: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListInsightsRequest {
    pub category: Option<String>,
    #[serde(default)]
    pub unactioned_only: bool,
}

impl<C: Connection> BrainControlPlane<C> {
    /// Records an insight. A blank action item is not stored.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for a blank title or unknown
    /// category, or `ControlError::Store` if the write fails.
    pub async fn add_insight(&self, request: AddInsightRequest) -> Result<Insight, ControlError> {
        let AddInsightRequest {
            title,
            summary,
            related_idea_ids,
            tags,
            category,
            action_item,
        } = request;
        ensure_non_empty(&title, "title")?;
        let category = parse_optional_category(category.as_deref())?;

        let insight = self
            .store
            .create_insight(NewInsight {
                title,
                summary,
                related_idea_ids: related_idea_ids.unwrap_or_default(),
                tags: normalize_tags(tags),
                category,
                action_item: non_blank_owned(action_item),
            })
            .await?;
        info!(insight_id = %insight.id, "insight recorded");
        Ok(insight)
    }

    /// Lists insights newest first.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for an unknown category, or
    /// `ControlError::Store` if the query fails.
    pub async fn list_insights(
        &self,
        request: ListInsightsRequest,
    ) -> Result<Vec<Insight>, ControlError> {
        let category = parse_optional_category(request.category.as_deref())?;
        Ok(self
            .store
            .list_insights(category, request.unactioned_only)
            .await?)
    }

    /// Marks an insight's action item as done. There is no way back.
    ///
    /// # Errors
    /// Returns `ControlError::NotFound` if the insight does not exist.
    pub async fn mark_actioned(&self, insight_id: &str) -> Result<Insight, ControlError> {
        ensure_non_empty(insight_id, "insight_id")?;
        let insight = self
            .store
            .mark_insight_actioned(insight_id)
            .await?
            .ok_or_else(|| ControlError::NotFound {
                entity: "insight",
                id: insight_id.to_string(),
            })?;
        info!(insight_id = %insight.id, "insight actioned");
        Ok(insight)
    }
}
