pub const TABLE_IDEA: &str = "idea";
pub const TABLE_TOPIC: &str = "topic";
pub const TABLE_IDEA_RELATIONSHIP: &str = "idea_relationship";
pub const TABLE_INSIGHT: &str = "insight";

pub const DEFAULT_RELATIONSHIP_TYPE: &str = "related";

/// Result cap applied to idea searches.
pub const SEARCH_RESULT_CAP: usize = 25;
/// Default page size when browsing a category.
pub const DEFAULT_CATEGORY_LIMIT: usize = 20;

/// Table and index definitions. Tables stay schemaless so idea metadata can
/// carry arbitrary keys.
pub const SCHEMA_DDL: &str = r"
DEFINE TABLE IF NOT EXISTS idea SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idea_category ON TABLE idea COLUMNS category;
DEFINE TABLE IF NOT EXISTS topic SCHEMALESS;
DEFINE INDEX IF NOT EXISTS topic_name_unique ON TABLE topic COLUMNS name UNIQUE;
DEFINE TABLE IF NOT EXISTS idea_relationship SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idea_relationship_source ON TABLE idea_relationship COLUMNS source_id;
DEFINE INDEX IF NOT EXISTS idea_relationship_target ON TABLE idea_relationship COLUMNS target_id;
DEFINE TABLE IF NOT EXISTS insight SCHEMALESS;
DEFINE INDEX IF NOT EXISTS insight_category ON TABLE insight COLUMNS category;
";
