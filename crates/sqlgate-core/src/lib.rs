//! # sqlgate-core
//!
//! Data model and configuration shared by every sqlgate crate.
//!
//! The types here describe one request's journey through the gateway:
//! schema metadata goes in, a [`SchemaSnapshot`] is rendered into the
//! generation prompt, the executed query yields a [`QueryResult`], and only a
//! [`MaskedResult`] is ever handed back to the caller.

pub mod config;

use serde::{Deserialize, Serialize};

pub use config::{
    ConfigError, GatewayConfig, GeneratorConfig, GuardrailsConfig, ServerConfig, UpstreamConfig,
    ValidationMode,
};

/// One column of database metadata, sourced verbatim from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
}

impl SchemaColumn {
    pub fn new(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            data_type: data_type.into(),
        }
    }

    /// The `schema.table` key this column is grouped under.
    pub fn table_key(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}

/// A table and its (possibly truncated) columns inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotTable {
    /// `schema.table`
    pub key: String,
    pub columns: Vec<SchemaColumn>,
}

/// Bounded, ordered summary of the database structure used to constrain the
/// generation prompt.
///
/// Tables keep the order in which they were first seen in the metadata, and
/// columns keep catalog order within each table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSnapshot {
    tables: Vec<SnapshotTable>,
}

impl SchemaSnapshot {
    pub fn from_tables(tables: Vec<SnapshotTable>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[SnapshotTable] {
        &self.tables
    }

    /// Look up the columns of a table by its `schema.table` key.
    pub fn get(&self, key: &str) -> Option<&[SchemaColumn]> {
        self.tables
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.columns.as_slice())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Raw result of executing a validated query.
///
/// Column names may repeat; every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }
}

/// A [`QueryResult`] whose sensitive cells have been replaced by the mask token.
///
/// Only the result masker constructs this type, so holding one means masking
/// has happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaskedResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl MaskedResult {
    #[doc(hidden)]
    pub fn from_masked_parts(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Natural-language request accepted by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful gateway response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The validated query that was executed.
    pub sql: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Short human-readable summary, e.g. "Returned 3 rows."
    pub narrative: String,
}

impl ChatResponse {
    pub fn new(sql: String, result: MaskedResult) -> Self {
        let narrative = format!("Returned {} rows.", result.row_count());
        Self {
            sql,
            columns: result.columns,
            rows: result.rows,
            narrative,
        }
    }
}
