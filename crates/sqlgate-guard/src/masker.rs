//! Output masking of sensitive columns.

use serde_json::Value;
use sqlgate_core::{GuardrailsConfig, MaskedResult, QueryResult};
use std::collections::HashSet;

/// Replaces non-null values of sensitive columns with a fixed token.
#[derive(Debug, Clone)]
pub struct ResultMasker {
    sensitive: HashSet<String>,
    token: String,
}

impl ResultMasker {
    /// Column names are matched case-insensitively.
    pub fn new<I, S>(sensitive_columns: I, token: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            sensitive: sensitive_columns
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
            token: token.into(),
        }
    }

    pub fn from_config(config: &GuardrailsConfig) -> Self {
        Self {
            sensitive: config.sensitive_column_set(),
            token: config.mask_token.clone(),
        }
    }

    pub fn is_sensitive(&self, column: &str) -> bool {
        self.sensitive.contains(&column.to_lowercase())
    }

    /// Mask `result` cell by cell. Nulls are never masked and shapes are kept.
    pub fn mask(&self, result: QueryResult) -> MaskedResult {
        let QueryResult { columns, rows } = result;
        let masked_positions: Vec<bool> = columns.iter().map(|c| self.is_sensitive(c)).collect();

        if !masked_positions.contains(&true) {
            return MaskedResult::from_masked_parts(columns, rows);
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .map(|(idx, value)| {
                        let sensitive = masked_positions.get(idx).copied().unwrap_or(false);
                        if sensitive && !value.is_null() {
                            Value::String(self.token.clone())
                        } else {
                            value
                        }
                    })
                    .collect()
            })
            .collect();

        MaskedResult::from_masked_parts(columns, rows)
    }
}
