use std::{
    collections::{BTreeMap, HashMap},
    error::Error,
    fmt,
    sync::Arc,
};

use brain_store::models::{
    Category,
    Idea,
    IdeaPatch,
    IdeaRelationship,
    Insight,
    NewIdea,
    NewInsight,
    NewRelationship,
    NewTopic,
    RelatedIdea,
    RelationDirection,
    Topic,
};
use brain_store::schema::{
    SCHEMA_DDL,
    TABLE_IDEA,
    TABLE_IDEA_RELATIONSHIP,
    TABLE_INSIGHT,
    TABLE_TOPIC,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use surrealdb::{Connection, Surreal, sql};
use uuid::Uuid;

#[derive(Debug)]
pub enum StoreError {
    Surreal(Box<surrealdb::Error>),
    InvalidInput(String),
    Constraint(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surreal(err) => write!(f, "SurrealDB error: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
            Self::Constraint(message) => write!(f, "Constraint violated: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Surreal(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// Record ids are projected to plain strings so rows deserialize without
// engine-specific id types.
const IDEA_FIELDS: &str =
    "meta::id(id) AS id, title, content, category, tags, metadata, created_at, is_archived";
const TOPIC_FIELDS: &str = "meta::id(id) AS id, name, description, category";
const RELATIONSHIP_FIELDS: &str =
    "meta::id(id) AS id, source_id, target_id, relationship_type, note, created_at";
const INSIGHT_FIELDS: &str = "meta::id(id) AS id, title, summary, related_idea_ids, tags, category, action_item, is_actioned, created_at";

/// Filters for idea listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaQuery {
    /// Every term must appear (case-insensitively) in the title or content.
    pub terms: Vec<String>,
    pub category: Option<Category>,
    /// Match-any tag overlap.
    pub tags: Vec<String>,
    pub include_archived: bool,
    pub limit: usize,
}

#[derive(Serialize)]
struct IdeaRow {
    #[serde(flatten)]
    idea: NewIdea,
    created_at: String,
    is_archived: bool,
}

#[derive(Serialize)]
struct RelationshipRow {
    #[serde(flatten)]
    relationship: NewRelationship,
    created_at: String,
}

#[derive(Serialize)]
struct InsightRow {
    #[serde(flatten)]
    insight: NewInsight,
    created_at: String,
    is_actioned: bool,
}

pub struct SurrealBrainStore<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> Clone for SurrealBrainStore<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealBrainStore<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db: Arc::new(db),
        }
    }

    #[must_use]
    pub const fn from_arc(db: Arc<Surreal<C>>) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn db(&self) -> &Surreal<C> {
        &self.db
    }

    /// Defines tables and indexes. Safe to run on every start.
    ///
    /// # Errors
    /// Returns `StoreError` if any definition fails.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        self.db.query(SCHEMA_DDL).await?.check()?;
        Ok(())
    }

    /// Inserts an idea with a fresh id and creation timestamp.
    ///
    /// # Errors
    /// Returns `StoreError` if the database write fails.
    pub async fn create_idea(&self, idea: NewIdea) -> StoreResult<Idea> {
        let row = IdeaRow {
            idea,
            created_at: now_timestamp(),
            is_archived: false,
        };
        self.insert_row(TABLE_IDEA, IDEA_FIELDS, row).await
    }

    /// Fetches an idea by id regardless of its archived flag.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn get_idea(&self, idea_id: &str) -> StoreResult<Option<Idea>> {
        self.select_by_id(TABLE_IDEA, IDEA_FIELDS, idea_id).await
    }

    /// Lists ideas matching the query, newest first.
    ///
    /// # Errors
    /// Returns `StoreError` if the limit is invalid or the database query fails.
    pub async fn query_ideas(&self, query: IdeaQuery) -> StoreResult<Vec<Idea>> {
        let IdeaQuery {
            terms,
            category,
            tags,
            include_archived,
            limit,
        } = query;
        let limit = limit_to_i64(limit)?;

        let mut conditions = Vec::new();
        if !include_archived {
            conditions.push("is_archived = false".to_string());
        }
        if category.is_some() {
            conditions.push("category = $category".to_string());
        }
        if !tags.is_empty() {
            conditions.push("tags CONTAINSANY $tags".to_string());
        }
        for index in 0..terms.len() {
            conditions.push(format!(
                "(string::lowercase(title) CONTAINS $term{index} OR string::lowercase(content) CONTAINS $term{index})"
            ));
        }

        let query = format!(
            "SELECT {IDEA_FIELDS} FROM {TABLE_IDEA}{} ORDER BY created_at DESC LIMIT $limit;",
            where_clause(&conditions)
        );
        let mut request = self.db.query(query).bind(("limit", limit));
        if let Some(category) = category {
            request = request.bind(("category", category.as_str().to_string()));
        }
        if !tags.is_empty() {
            request = request.bind(("tags", tags));
        }
        for (index, term) in terms.into_iter().enumerate() {
            request = request.bind((format!("term{index}"), term.to_lowercase()));
        }
        let mut response = request.await?.check()?;
        let records: Vec<Idea> = response.take(0)?;
        Ok(records)
    }

    /// Replaces the fields present in the patch. Returns `None` when the idea
    /// does not exist.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn update_idea(&self, idea_id: &str, patch: IdeaPatch) -> StoreResult<Option<Idea>> {
        if self.get_idea(idea_id).await?.is_none() {
            return Ok(None);
        }

        let IdeaPatch {
            title,
            content,
            category,
            tags,
            metadata,
        } = patch;

        let mut assignments = Vec::new();
        if title.is_some() {
            assignments.push("title = $title");
        }
        if content.is_some() {
            assignments.push("content = $content");
        }
        if category.is_some() {
            assignments.push("category = $category");
        }
        if tags.is_some() {
            assignments.push("tags = $tags");
        }
        if metadata.is_some() {
            assignments.push("metadata = $metadata");
        }
        if assignments.is_empty() {
            return self.get_idea(idea_id).await;
        }

        let query = format!(
            "UPDATE type::thing('{TABLE_IDEA}', $id) SET {} RETURN NONE; SELECT {IDEA_FIELDS} FROM type::thing('{TABLE_IDEA}', $id);",
            assignments.join(", ")
        );
        let mut request = self.db.query(query).bind(("id", idea_id.to_string()));
        if let Some(title) = title {
            request = request.bind(("title", title));
        }
        if let Some(content) = content {
            request = request.bind(("content", content));
        }
        if let Some(category) = category {
            request = request.bind(("category", category.as_str().to_string()));
        }
        if let Some(tags) = tags {
            request = request.bind(("tags", tags));
        }
        if let Some(metadata) = metadata {
            request = request.bind(json_binding("metadata", JsonValue::Object(metadata)));
        }
        let mut response = request.await?.check()?;
        let mut records: Vec<Idea> = response.take(1)?;
        Ok(records.pop())
    }

    /// Sets `is_archived`. Returns `None` when the idea does not exist.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn archive_idea(&self, idea_id: &str) -> StoreResult<Option<Idea>> {
        self.set_flag(TABLE_IDEA, IDEA_FIELDS, idea_id, "is_archived").await
    }

    /// Creates a topic. Duplicate names are rejected by the unique index.
    ///
    /// # Errors
    /// Returns `StoreError` if the database write fails.
    pub async fn create_topic(&self, topic: NewTopic) -> StoreResult<Topic> {
        self.insert_row(TABLE_TOPIC, TOPIC_FIELDS, topic).await
    }

    /// Fetches a topic by exact name.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn find_topic_by_name(&self, name: &str) -> StoreResult<Option<Topic>> {
        let query = format!("SELECT {TOPIC_FIELDS} FROM {TABLE_TOPIC} WHERE name = $name LIMIT 1;");
        let mut response = self
            .db
            .query(query)
            .bind(("name", name.to_string()))
            .await?
            .check()?;
        let mut records: Vec<Topic> = response.take(0)?;
        Ok(records.pop())
    }

    /// Lists topics ordered by name, optionally scoped to a category.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn list_topics(&self, category: Option<Category>) -> StoreResult<Vec<Topic>> {
        let response = if let Some(category) = category {
            let query = format!(
                "SELECT {TOPIC_FIELDS} FROM {TABLE_TOPIC} WHERE category = $category ORDER BY name ASC;"
            );
            self.db
                .query(query)
                .bind(("category", category.as_str().to_string()))
                .await?
        } else {
            let query = format!("SELECT {TOPIC_FIELDS} FROM {TABLE_TOPIC} ORDER BY name ASC;");
            self.db.query(query).await?
        };
        let mut response = response.check()?;
        let records: Vec<Topic> = response.take(0)?;
        Ok(records)
    }

    /// Case-insensitive substring match on topic names.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn search_topics(&self, fragment: &str) -> StoreResult<Vec<Topic>> {
        let query = format!(
            "SELECT {TOPIC_FIELDS} FROM {TABLE_TOPIC} WHERE string::lowercase(name) CONTAINS $fragment ORDER BY name ASC;"
        );
        let mut response = self
            .db
            .query(query)
            .bind(("fragment", fragment.to_lowercase()))
            .await?
            .check()?;
        let records: Vec<Topic> = response.take(0)?;
        Ok(records)
    }

    /// Creates a directed edge. Both endpoints must be stored ideas.
    ///
    /// # Errors
    /// Returns `StoreError::Constraint` if an endpoint is missing, or another
    /// `StoreError` if the database write fails.
    pub async fn create_relationship(
        &self,
        relationship: NewRelationship,
    ) -> StoreResult<IdeaRelationship> {
        let query = format!(
            "SELECT VALUE meta::id(id) FROM type::thing('{TABLE_IDEA}', $source_id); SELECT VALUE meta::id(id) FROM type::thing('{TABLE_IDEA}', $target_id);"
        );
        let mut response = self
            .db
            .query(query)
            .bind(("source_id", relationship.source_id.clone()))
            .bind(("target_id", relationship.target_id.clone()))
            .await?
            .check()?;
        let source: Vec<String> = response.take(0)?;
        let target: Vec<String> = response.take(1)?;
        if source.is_empty() {
            return Err(missing_endpoint("source_id", &relationship.source_id));
        }
        if target.is_empty() {
            return Err(missing_endpoint("target_id", &relationship.target_id));
        }

        let row = RelationshipRow {
            relationship,
            created_at: now_timestamp(),
        };
        self.insert_row(TABLE_IDEA_RELATIONSHIP, RELATIONSHIP_FIELDS, row)
            .await
    }

    /// Edges leaving the idea, each with its target idea embedded.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn related_from(&self, idea_id: &str) -> StoreResult<Vec<RelatedIdea>> {
        self.related(idea_id, RelationDirection::Forward).await
    }

    /// Edges arriving at the idea, each with its source idea embedded.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn related_to(&self, idea_id: &str) -> StoreResult<Vec<RelatedIdea>> {
        self.related(idea_id, RelationDirection::Reverse).await
    }

    /// Hard-deletes an edge and returns the removed rows; empty when the id
    /// was unknown.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn delete_relationship(
        &self,
        relationship_id: &str,
    ) -> StoreResult<Vec<IdeaRelationship>> {
        let query = format!(
            "SELECT {RELATIONSHIP_FIELDS} FROM type::thing('{TABLE_IDEA_RELATIONSHIP}', $id); DELETE type::thing('{TABLE_IDEA_RELATIONSHIP}', $id) RETURN NONE;"
        );
        let mut response = self
            .db
            .query(query)
            .bind(("id", relationship_id.to_string()))
            .await?
            .check()?;
        let records: Vec<IdeaRelationship> = response.take(0)?;
        Ok(records)
    }

    /// Inserts an insight with a fresh id and creation timestamp.
    ///
    /// # Errors
    /// Returns `StoreError` if the database write fails.
    pub async fn create_insight(&self, insight: NewInsight) -> StoreResult<Insight> {
        let row = InsightRow {
            insight,
            created_at: now_timestamp(),
            is_actioned: false,
        };
        self.insert_row(TABLE_INSIGHT, INSIGHT_FIELDS, row).await
    }

    /// Lists insights newest first.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn list_insights(
        &self,
        category: Option<Category>,
        unactioned_only: bool,
    ) -> StoreResult<Vec<Insight>> {
        let mut conditions = Vec::new();
        if category.is_some() {
            conditions.push("category = $category".to_string());
        }
        if unactioned_only {
            conditions.push("is_actioned = false".to_string());
        }
        let query = format!(
            "SELECT {INSIGHT_FIELDS} FROM {TABLE_INSIGHT}{} ORDER BY created_at DESC;",
            where_clause(&conditions)
        );
        let mut request = self.db.query(query);
        if let Some(category) = category {
            request = request.bind(("category", category.as_str().to_string()));
        }
        let mut response = request.await?.check()?;
        let records: Vec<Insight> = response.take(0)?;
        Ok(records)
    }

    /// Sets `is_actioned`. Returns `None` when the insight does not exist.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn mark_insight_actioned(&self, insight_id: &str) -> StoreResult<Option<Insight>> {
        self.set_flag(TABLE_INSIGHT, INSIGHT_FIELDS, insight_id, "is_actioned")
            .await
    }

    async fn related(
        &self,
        idea_id: &str,
        direction: RelationDirection,
    ) -> StoreResult<Vec<RelatedIdea>> {
        let (anchor, counterpart) = match direction {
            RelationDirection::Forward => ("source_id", "target_id"),
            RelationDirection::Reverse => ("target_id", "source_id"),
        };
        let query = format!(
            "SELECT {RELATIONSHIP_FIELDS} FROM {TABLE_IDEA_RELATIONSHIP} WHERE {anchor} = $id ORDER BY created_at ASC; \
             SELECT {IDEA_FIELDS} FROM {TABLE_IDEA} WHERE meta::id(id) INSIDE (SELECT VALUE {counterpart} FROM {TABLE_IDEA_RELATIONSHIP} WHERE {anchor} = $id);"
        );
        let mut response = self
            .db
            .query(query)
            .bind(("id", idea_id.to_string()))
            .await?
            .check()?;
        let edges: Vec<IdeaRelationship> = response.take(0)?;
        let ideas: Vec<Idea> = response.take(1)?;
        let ideas: HashMap<String, Idea> = ideas
            .into_iter()
            .map(|idea| (idea.id.clone(), idea))
            .collect();

        let related = edges
            .into_iter()
            .map(|edge| match direction {
                RelationDirection::Forward => {
                    let target = ideas.get(&edge.target_id).cloned();
                    RelatedIdea::forward(edge, target)
                }
                RelationDirection::Reverse => {
                    let source = ideas.get(&edge.source_id).cloned();
                    RelatedIdea::reverse(edge, source)
                }
            })
            .collect();
        Ok(related)
    }

    async fn insert_row<R, T>(&self, table: &str, fields: &str, row: R) -> StoreResult<T>
    where
        R: Serialize,
        T: DeserializeOwned,
    {
        let row = serde_json::to_value(row)
            .map_err(|err| StoreError::InvalidInput(format!("unencodable {table} row: {err}")))?;
        let query = format!(
            "CREATE type::thing('{table}', $id) CONTENT $row RETURN NONE; SELECT {fields} FROM type::thing('{table}', $id);"
        );
        let mut response = self
            .db
            .query(query)
            .bind(("id", new_record_id()))
            .bind(json_binding("row", row))
            .await?
            .check()?;
        let mut records: Vec<T> = response.take(1)?;
        require_record(records.pop(), table)
    }

    async fn select_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        fields: &str,
        id: &str,
    ) -> StoreResult<Option<T>> {
        let query = format!("SELECT {fields} FROM type::thing('{table}', $id);");
        let mut response = self
            .db
            .query(query)
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        let mut records: Vec<T> = response.take(0)?;
        Ok(records.pop())
    }

    async fn set_flag<T: DeserializeOwned>(
        &self,
        table: &str,
        fields: &str,
        id: &str,
        flag: &str,
    ) -> StoreResult<Option<T>> {
        let existing: Option<T> = self.select_by_id(table, fields, id).await?;
        if existing.is_none() {
            return Ok(None);
        }
        let query = format!(
            "UPDATE type::thing('{table}', $id) SET {flag} = true RETURN NONE; SELECT {fields} FROM type::thing('{table}', $id);"
        );
        let mut response = self
            .db
            .query(query)
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        let mut records: Vec<T> = response.take(1)?;
        Ok(records.pop())
    }
}

fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

/// Binds a JSON value under `name`. JSON `null` becomes `NULL` rather than
/// `NONE`, which the engine would drop from stored objects.
fn json_binding(name: &str, value: JsonValue) -> sql::Object {
    sql::Object::from(BTreeMap::from([(name.to_string(), json_to_surreal(value))]))
}

fn json_to_surreal(value: JsonValue) -> sql::Value {
    match value {
        JsonValue::Null => sql::Value::Null,
        JsonValue::Bool(flag) => sql::Value::Bool(flag),
        JsonValue::Number(number) => {
            if let Some(int) = number.as_i64() {
                sql::Value::from(int)
            } else if let Some(unsigned) = number.as_u64() {
                sql::Value::from(unsigned)
            } else {
                sql::Value::from(number.as_f64().unwrap_or_default())
            }
        }
        JsonValue::String(text) => sql::Value::from(text),
        JsonValue::Array(items) => {
            sql::Value::Array(sql::Array::from(
                items.into_iter().map(json_to_surreal).collect::<Vec<_>>(),
            ))
        }
        JsonValue::Object(map) => sql::Value::Object(sql::Object::from(
            map.into_iter()
                .map(|(key, value)| (key, json_to_surreal(value)))
                .collect::<BTreeMap<String, sql::Value>>(),
        )),
    }
}

fn require_record<T>(record: Option<T>, table: &str) -> StoreResult<T> {
    record.ok_or_else(|| {
        StoreError::InvalidInput(format!(
            "No record returned when creating {table}"
        ))
    })
}

fn missing_endpoint(field: &str, id: &str) -> StoreError {
    StoreError::Constraint(format!("{field} references unknown idea {id}"))
}

fn limit_to_i64(limit: usize) -> StoreResult<i64> {
    i64::try_from(limit).map_err(|_| {
        StoreError::InvalidInput("limit exceeds supported range".to_string())
    })
}

fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

// Nanosecond RFC 3339 in UTC, so lexical order is chronological order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_joins_conditions() {
        assert_eq!(where_clause(&[]), "");
        let conditions = vec!["a = 1".to_string(), "b = 2".to_string()];
        assert_eq!(where_clause(&conditions), " WHERE a = 1 AND b = 2");
    }

    #[test]
    fn json_null_binds_as_null_not_none() {
        let binding = json_binding(
            "metadata",
            serde_json::json!({ "n": null, "nested": [null, 1, 2.5, "x"], "ok": true }),
        );
        let sql::Value::Object(metadata) = &binding.0["metadata"] else {
            panic!("metadata should bind as an object");
        };
        assert_eq!(metadata.0["n"], sql::Value::Null);
        assert_eq!(metadata.0["ok"], sql::Value::Bool(true));
        let sql::Value::Array(nested) = &metadata.0["nested"] else {
            panic!("nested should bind as an array");
        };
        assert_eq!(nested.0[0], sql::Value::Null);
        assert_eq!(nested.0[1], sql::Value::from(1_i64));
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let first = now_timestamp();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = now_timestamp();
        assert!(first < second);
        assert!(first.ends_with('Z'));
    }
}
