use async_trait::async_trait;
use sqlgate_core::{QueryResult, SchemaColumn};
use sqlgate_guard::ValidatedQuery;

/// Database collaborator.
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// Column metadata for every user table, in catalog order
    /// (schema, table, ordinal position).
    async fn fetch_schema_metadata(&self) -> anyhow::Result<Vec<SchemaColumn>>;

    /// Execute a validated query and return its columns and rows.
    async fn execute(&self, query: &ValidatedQuery) -> anyhow::Result<QueryResult>;
}

/// Text-generation collaborator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;

    /// Human-readable name for logs (e.g. "ollama").
    fn name(&self) -> &str;
}
