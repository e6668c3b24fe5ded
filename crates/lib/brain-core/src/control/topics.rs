use brain_store::models::{Category, NewTopic, Topic};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::{debug, info};

use super::{
    BrainControlPlane,
    ControlError,
    ensure_non_empty,
    non_blank_owned,
    parse_optional_category,
};

/// Input payload for registering a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTopicRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Outcome of seeding the default topic registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

/// Starter tags, a handful per category.
pub const DEFAULT_TOPICS: &[(&str, &str, Category)] = &[
    ("weekly-list", "Regular weekly shopping items", Category::Groceries),
    ("costco-run", "Costco bulk shopping", Category::Groceries),
    ("meal-prep", "Ingredients for meal prep", Category::Groceries),
    ("scripture-insight", "Scriptural insights and study notes", Category::ReligiousStudy),
    ("faith", "Thoughts on faith and belief", Category::ReligiousStudy),
    ("talk-notes", "Notes from talks and sermons", Category::ReligiousStudy),
    ("spiritual-journal", "Personal spiritual reflections", Category::ReligiousStudy),
    ("equities", "Stock and equity research", Category::FinanceJournal),
    ("crypto", "Cryptocurrency research and notes", Category::FinanceJournal),
    ("macro", "Macroeconomic observations", Category::FinanceJournal),
    ("portfolio", "Portfolio management notes", Category::FinanceJournal),
    ("real-estate", "Real estate investment ideas", Category::FinanceJournal),
    ("feature-request", "New feature ideas", Category::ProductIdeas),
    ("ux-improvement", "User experience improvements", Category::ProductIdeas),
    ("mvp", "Minimum viable product concepts", Category::ProductIdeas),
    ("bug-idea", "Bug-inspired feature improvements", Category::ProductIdeas),
    ("fitness", "Exercise and fitness notes", Category::HealthWellness),
    ("nutrition", "Diet and nutrition tracking", Category::HealthWellness),
    ("sleep", "Sleep quality and habits", Category::HealthWellness),
    ("mental-health", "Mental health and mindfulness", Category::HealthWellness),
    ("treatment", "CF treatment plans and updates", Category::CfCare),
    ("insurance", "Insurance claims and coverage", Category::CfCare),
    ("medication", "Medication tracking and changes", Category::CfCare),
    ("appointment", "Doctor appointments and follow-ups", Category::CfCare),
    ("pulmonary", "Pulmonary function and respiratory notes", Category::CfCare),
    ("recipe", "New recipes to try or save", Category::CookingRecipes),
    ("technique", "Cooking techniques and tips", Category::CookingRecipes),
    ("ingredient-note", "Notes on specific ingredients", Category::CookingRecipes),
    ("meal-plan", "Weekly meal planning", Category::CookingRecipes),
    ("strategy", "Business strategy notes", Category::BusinessLearning),
    ("book-notes", "Notes from business books", Category::BusinessLearning),
    ("market-research", "Market research findings", Category::BusinessLearning),
    ("leadership", "Leadership and management insights", Category::BusinessLearning),
    ("startup", "Startup and entrepreneurship ideas", Category::BusinessLearning),
];

impl<C: Connection> BrainControlPlane<C> {
    /// Registers a topic. Blank description/category are not stored.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for a blank name or unknown
    /// category, or `ControlError::Store` if the write fails (including a
    /// duplicate name).
    pub async fn add_topic(&self, request: AddTopicRequest) -> Result<Topic, ControlError> {
        let AddTopicRequest {
            name,
            description,
            category,
        } = request;
        ensure_non_empty(&name, "name")?;
        let category = parse_optional_category(category.as_deref())?;

        let topic = self
            .store
            .create_topic(NewTopic {
                name,
                description: non_blank_owned(description),
                category,
            })
            .await?;
        info!(topic = %topic.name, "topic registered");
        Ok(topic)
    }

    /// Lists topics by name, optionally scoped to a category.
    ///
    /// # Errors
    /// Returns `ControlError::Validation` for an unknown category, or
    /// `ControlError::Store` if the query fails.
    pub async fn list_topics(&self, category: Option<&str>) -> Result<Vec<Topic>, ControlError> {
        let category = parse_optional_category(category)?;
        Ok(self.store.list_topics(category).await?)
    }

    /// Finds topics whose name contains the fragment, ignoring case.
    ///
    /// # Errors
    /// Returns `ControlError::Store` if the query fails.
    pub async fn search_topics(&self, query: &str) -> Result<Vec<Topic>, ControlError> {
        debug!(query, "searching topics");
        Ok(self.store.search_topics(query.trim()).await?)
    }

    /// Inserts the built-in topic registry, skipping names already present.
    ///
    /// # Errors
    /// Returns `ControlError::Store` if a lookup or write fails.
    pub async fn seed_default_topics(&self) -> Result<SeedReport, ControlError> {
        let mut report = SeedReport::default();
        for (name, description, category) in DEFAULT_TOPICS {
            if self.store.find_topic_by_name(name).await?.is_some() {
                debug!(topic = name, "topic already exists, skipping");
                report.skipped += 1;
                continue;
            }
            self.store
                .create_topic(NewTopic {
                    name: (*name).to_string(),
                    description: Some((*description).to_string()),
                    category: Some(*category),
                })
                .await?;
            report.created += 1;
        }
        info!(created = report.created, skipped = report.skipped, "default topics seeded");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn default_topics_cover_every_category() {
        let covered: HashSet<Category> = DEFAULT_TOPICS.iter().map(|(_, _, category)| *category).collect();
        assert_eq!(covered.len(), Category::ALL.len());
    }

    #[test]
    fn default_topic_names_are_unique() {
        let names: HashSet<&str> = DEFAULT_TOPICS.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(names.len(), DEFAULT_TOPICS.len());
    }
}
