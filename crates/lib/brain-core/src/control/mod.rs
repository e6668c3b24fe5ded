use std::{collections::HashSet, error::Error, fmt, sync::Arc};

use brain_store::models::Category;
use surrealdb::{Connection, Surreal};

use crate::store::{StoreError, SurrealBrainStore};

pub mod ideas;
pub mod insights;
pub mod relationships;
pub mod system;
pub mod topics;

pub use ideas::{AddIdeaRequest, SearchIdeasRequest};
pub use insights::{AddInsightRequest, ListInsightsRequest};
pub use relationships::LinkIdeasRequest;
pub use system::{SystemInfo, system_info};
pub use topics::{AddTopicRequest, SeedReport};

#[derive(Debug)]
pub enum ControlError {
    Validation(String),
    NotFound { entity: &'static str, id: String },
    Store(StoreError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "Validation failed: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Tool-facing operations over the brain store. Holds no state of its own
/// beyond the shared store handle.
pub struct BrainControlPlane<C: Connection> {
    store: SurrealBrainStore<C>,
}

impl<C: Connection> Clone for BrainControlPlane<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: Connection> BrainControlPlane<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            store: SurrealBrainStore::new(db),
        }
    }

    pub fn from_arc(db: Arc<Surreal<C>>) -> Self {
        Self {
            store: SurrealBrainStore::from_arc(db),
        }
    }

    pub const fn with_store(store: SurrealBrainStore<C>) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &SurrealBrainStore<C> {
        &self.store
    }
}

fn ensure_non_empty(value: &str, field: &str) -> Result<(), ControlError> {
    if value.trim().is_empty() {
        return Err(ControlError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn parse_category(value: &str) -> Result<Category, ControlError> {
    value
        .parse()
        .map_err(|err: brain_store::models::CategoryParseError| {
            ControlError::Validation(err.to_string())
        })
}

/// Blank strings count as "no category".
fn parse_optional_category(value: Option<&str>) -> Result<Option<Category>, ControlError> {
    match non_blank(value) {
        Some(value) => parse_category(value).map(Some),
        None => Ok(None),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn non_blank_owned(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Trims tags, drops empties, and removes repeats keeping the first spelling.
fn normalize_tags(tags: Option<Vec<String>>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for tag in tags.unwrap_or_default() {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            normalized.push(trimmed.to_string());
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tags_defaults_and_dedups() {
        assert!(normalize_tags(None).is_empty());
        let tags = normalize_tags(Some(vec![
            " faith ".to_string(),
            String::new(),
            "faith".to_string(),
            "prayer".to_string(),
        ]));
        assert_eq!(tags, vec!["faith".to_string(), "prayer".to_string()]);
    }

    #[test]
    fn blank_optional_category_is_absent() {
        assert_eq!(parse_optional_category(Some("  ")).expect("blank is ok"), None);
        assert_eq!(
            parse_optional_category(Some("cf_care")).expect("valid"),
            Some(Category::CfCare)
        );
        assert!(matches!(
            parse_optional_category(Some("misc")),
            Err(ControlError::Validation(_))
        ));
    }

    #[test]
    fn required_fields_reject_blank() {
        assert!(ensure_non_empty("abc", "idea_id").is_ok());
        let err = ensure_non_empty("   ", "idea_id").expect_err("blank should fail");
        assert_eq!(err.to_string(), "Validation failed: idea_id is required");
    }
}
