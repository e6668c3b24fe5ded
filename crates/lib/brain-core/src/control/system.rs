use std::collections::BTreeMap;

use brain_store::models::Category;
use brain_store::schema::{TABLE_IDEA, TABLE_IDEA_RELATIONSHIP, TABLE_INSIGHT, TABLE_TOPIC};
use serde::Serialize;

/// Static orientation document handed to the agent at session start.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SystemInfo {
    pub categories: BTreeMap<&'static str, &'static str>,
    pub tables: BTreeMap<&'static str, &'static str>,
    pub guidelines: Vec<&'static str>,
}

const GUIDELINES: &[&str] = &[
    "Keep responses SHORT; the user is usually on mobile",
    "Confirm every write with a brief summary of what was saved",
    "For cf_care: always store metadata.type (treatment/insurance/medication/appointment)",
    "For religious_study and finance_journal: ask if it connects to existing notes",
    "When asked 'what have I been thinking about X': search across ALL categories",
    "Use tags liberally; they power cross-category discovery",
];

/// Describes categories, tables, and behavioral guidelines. Reads no store
/// state.
#[must_use]
pub fn system_info() -> SystemInfo {
    let categories = Category::ALL
        .into_iter()
        .map(|category| (category.as_str(), category.description()))
        .collect();

    let tables = BTreeMap::from([
        (
            TABLE_IDEA,
            "Core notes. Fields: id, title, content, category, tags[], metadata{}, created_at, is_archived",
        ),
        (
            TABLE_TOPIC,
            "Tag registry for autocomplete. Fields: id, name, description, category",
        ),
        (
            TABLE_IDEA_RELATIONSHIP,
            "Links between ideas. Fields: id, source_id, target_id, relationship_type, note, created_at",
        ),
        (
            TABLE_INSIGHT,
            "Derived patterns. Fields: id, title, summary, related_idea_ids[], tags[], category, action_item, is_actioned, created_at",
        ),
    ]);

    SystemInfo {
        categories,
        tables,
        guidelines: GUIDELINES.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_category_and_table() {
        let info = system_info();
        assert_eq!(info.categories.len(), Category::ALL.len());
        assert!(info.categories["cf_care"].contains("metadata.type"));
        assert_eq!(info.tables.len(), 4);
        assert!(info.tables.contains_key("idea_relationship"));
        assert!(!info.guidelines.is_empty());
    }
}
