//! Safety gate configuration.
//!
//! These values bound what the generator is shown (tables, columns), how
//! generated text is judged, and what leaves the system (row ceiling, masked
//! columns).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How strictly candidate queries are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Substring denylist plus a check that the first statement starts with
    /// `select`. Statements after the first are not inspected.
    #[default]
    Compatible,
    /// Everything `Compatible` does, and additionally requires the text to
    /// parse into exactly one query statement.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsConfig {
    /// Row ceiling appended when the generated query has none.
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Maximum number of tables rendered into the prompt.
    #[serde(default = "default_max_tables")]
    pub max_tables: usize,

    /// Maximum number of columns rendered per table.
    #[serde(default = "default_max_columns")]
    pub max_columns_per_table: usize,

    /// `schema.table` keys never shown to the generator.
    #[serde(default)]
    pub ignored_tables: Vec<String>,

    /// Output columns whose non-null values are masked (case-insensitive).
    #[serde(default = "default_sensitive_columns")]
    pub sensitive_columns: Vec<String>,

    /// Replacement for masked values.
    #[serde(default = "default_mask_token")]
    pub mask_token: String,

    #[serde(default)]
    pub validation_mode: ValidationMode,

    /// Upper bound for schema fetch and query execution.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_seconds: u64,
}

impl Default for GuardrailsConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_tables: default_max_tables(),
            max_columns_per_table: default_max_columns(),
            ignored_tables: Vec::new(),
            sensitive_columns: default_sensitive_columns(),
            mask_token: default_mask_token(),
            validation_mode: ValidationMode::default(),
            query_timeout_seconds: default_query_timeout(),
        }
    }
}

impl GuardrailsConfig {
    /// Ignored tables as a set of exact `schema.table` keys.
    pub fn ignored_table_set(&self) -> HashSet<String> {
        self.ignored_tables.iter().cloned().collect()
    }

    /// Sensitive column names, lower-cased.
    pub fn sensitive_column_set(&self) -> HashSet<String> {
        self.sensitive_columns
            .iter()
            .map(|c| c.to_lowercase())
            .collect()
    }
}

fn default_limit() -> u64 {
    200
}

fn default_max_tables() -> usize {
    20
}

fn default_max_columns() -> usize {
    20
}

fn default_sensitive_columns() -> Vec<String> {
    vec!["email".to_string(), "phone".to_string(), "ssn".to_string()]
}

fn default_mask_token() -> String {
    "****".to_string()
}

fn default_query_timeout() -> u64 {
    30
}
