use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key/value bag attached to ideas. Conventions vary by category.
pub type Metadata = Map<String, Value>;

/// Life-domain bucket every idea, topic, and insight may belong to.
///
/// Serialized as its `snake_case` name; anything outside the closed set is
/// rejected on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Groceries,
    ReligiousStudy,
    FinanceJournal,
    ProductIdeas,
    HealthWellness,
    CfCare,
    CookingRecipes,
    BusinessLearning,
}

impl Category {
    pub const ALL: [Self; 8] = [
        Self::Groceries,
        Self::ReligiousStudy,
        Self::FinanceJournal,
        Self::ProductIdeas,
        Self::HealthWellness,
        Self::CfCare,
        Self::CookingRecipes,
        Self::BusinessLearning,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::ReligiousStudy => "religious_study",
            Self::FinanceJournal => "finance_journal",
            Self::ProductIdeas => "product_ideas",
            Self::HealthWellness => "health_wellness",
            Self::CfCare => "cf_care",
            Self::CookingRecipes => "cooking_recipes",
            Self::BusinessLearning => "business_learning",
        }
    }

    /// Short description of what belongs in the category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Groceries => "Shopping lists, meal-prep ingredients, household supplies",
            Self::ReligiousStudy => {
                "Scripture study notes, talk reflections, theology questions. Always ask if it connects to past notes"
            }
            Self::FinanceJournal => {
                "Budget thoughts, investment ideas, financial goals. Always ask if it connects to past notes"
            }
            Self::ProductIdeas => "App concepts, SaaS ideas, side-project plans",
            Self::HealthWellness => "Exercise, nutrition, mental-health reflections",
            Self::CfCare => {
                "Cystic fibrosis care. ALWAYS include metadata.type as one of: treatment, insurance, medication, appointment"
            }
            Self::CookingRecipes => "Recipes, cooking techniques, meal plans",
            Self::BusinessLearning => "Books, courses, frameworks, career insights",
        }
    }

    /// Comma separated list of every accepted category name.
    #[must_use]
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError {
    pub value: String,
}

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid category `{}`; expected one of: {}",
            self.value,
            Category::names()
        )
    }
}

impl Error for CategoryParseError {}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == trimmed)
            .ok_or_else(|| CategoryParseError {
                value: value.to_string(),
            })
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// A captured note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: String,
    #[serde(default)]
    pub is_archived: bool,
}

/// Insert payload for an idea. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIdea {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub metadata: Metadata,
}

/// Partial replacement of idea fields. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IdeaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl IdeaPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.metadata.is_none()
    }
}

/// Registered tag used for autocomplete and discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTopic {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Directed, typed edge between two ideas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdeaRelationship {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: String,
    #[serde(default)]
    pub note: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRelationship {
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: String,
    pub note: String,
}

/// Which endpoint of an edge the queried idea sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationDirection {
    /// The queried idea is the source; the target idea is embedded.
    Forward,
    /// The queried idea is the target; the source idea is embedded.
    Reverse,
}

/// Relationship row with the idea on the other end embedded inline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelatedIdea {
    #[serde(flatten)]
    pub relationship: IdeaRelationship,
    pub direction: RelationDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Idea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Idea>,
}

impl RelatedIdea {
    #[must_use]
    pub const fn forward(relationship: IdeaRelationship, target: Option<Idea>) -> Self {
        Self {
            relationship,
            direction: RelationDirection::Forward,
            target,
            source: None,
        }
    }

    #[must_use]
    pub const fn reverse(relationship: IdeaRelationship, source: Option<Idea>) -> Self {
        Self {
            relationship,
            direction: RelationDirection::Reverse,
            target: None,
            source,
        }
    }

    /// The embedded counterpart idea, whichever side it is on.
    #[must_use]
    pub const fn counterpart(&self) -> Option<&Idea> {
        match self.direction {
            RelationDirection::Forward => self.target.as_ref(),
            RelationDirection::Reverse => self.source.as_ref(),
        }
    }
}

/// Derived observation spanning one or more ideas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Insight {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub related_idea_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_item: Option<String>,
    #[serde(default)]
    pub is_actioned: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewInsight {
    pub title: String,
    pub summary: String,
    pub related_idea_ids: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_item: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().expect("known category");
            assert_eq!(parsed, category);
        }
        assert_eq!(
            serde_json::to_value(Category::CfCare).expect("serialize"),
            json!("cf_care")
        );
    }

    #[test]
    fn unknown_category_lists_accepted_values() {
        let err = "chores".parse::<Category>().expect_err("should reject");
        let message = err.to_string();
        assert!(message.contains("chores"));
        assert!(message.contains("business_learning"));
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let result: Result<IdeaPatch, _> =
            serde_json::from_value(json!({ "title": "x", "is_archived": true }));
        assert!(result.is_err());
    }

    #[test]
    fn patch_rejects_invalid_category() {
        let result: Result<IdeaPatch, _> = serde_json::from_value(json!({ "category": "misc" }));
        let message = result.expect_err("should reject").to_string();
        assert!(message.contains("invalid category"));
    }

    #[test]
    fn patch_treats_null_as_absent() {
        let patch: IdeaPatch =
            serde_json::from_value(json!({ "title": null })).expect("valid patch");
        assert!(patch.is_empty());
    }

    #[test]
    fn topic_omits_empty_optional_fields() {
        let topic = NewTopic {
            name: "faith".to_string(),
            description: None,
            category: None,
        };
        assert_eq!(
            serde_json::to_value(topic).expect("serialize"),
            json!({ "name": "faith" })
        );
    }

    #[test]
    fn related_idea_flattens_relationship() {
        let relationship = IdeaRelationship {
            id: "r1".to_string(),
            source_id: "a".to_string(),
            target_id: "b".to_string(),
            relationship_type: "informs".to_string(),
            note: String::new(),
            created_at: "2026-01-01T00:00:00.000000000Z".to_string(),
        };
        let value = serde_json::to_value(RelatedIdea::forward(relationship, None))
            .expect("serialize");
        assert_eq!(value["relationship_type"], json!("informs"));
        assert_eq!(value["direction"], json!("forward"));
        assert!(value.get("target").is_none());
    }

    #[test]
    fn ideas_dedupe_by_full_equality() {
        fn dedupe<T: Eq + Clone>(items: &[T]) -> Vec<T> {
            let mut unique: Vec<T> = Vec::new();
            for item in items {
                if !unique.contains(item) {
                    unique.push(item.clone());
                }
            }
            unique
        }

        let patch: IdeaPatch =
            serde_json::from_value(json!({ "metadata": { "type": "medication", "dose": null } }))
                .expect("valid patch");
        let other: IdeaPatch =
            serde_json::from_value(json!({ "metadata": { "type": "medication" } }))
                .expect("valid patch");
        assert_eq!(dedupe(&[patch.clone(), patch.clone(), other]).len(), 2);

        let idea = NewIdea {
            title: "Milk".to_string(),
            content: "buy milk".to_string(),
            category: Category::Groceries,
            tags: vec!["weekly-list".to_string()],
            metadata: Metadata::new(),
        };
        assert_eq!(dedupe(&[idea.clone(), idea]).len(), 1);
    }
}
