//! Bounded schema snapshots for the generation prompt.

use sqlgate_core::{GuardrailsConfig, SchemaColumn, SchemaSnapshot, SnapshotTable};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Group metadata rows into a [`SchemaSnapshot`].
///
/// Rows are grouped by `schema.table` in first-seen order, ignored keys are
/// dropped, and the result is cut to the first `max_tables` tables and the
/// first `max_columns` columns of each.
pub fn build_snapshot(
    rows: Vec<SchemaColumn>,
    ignored_tables: &HashSet<String>,
    max_tables: usize,
    max_columns: usize,
) -> SchemaSnapshot {
    let mut tables: Vec<SnapshotTable> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = row.table_key();
        if ignored_tables.contains(&key) {
            continue;
        }

        match positions.get(&key) {
            Some(&idx) => tables[idx].columns.push(row),
            None => {
                positions.insert(key.clone(), tables.len());
                tables.push(SnapshotTable {
                    key,
                    columns: vec![row],
                });
            }
        }
    }

    tables.truncate(max_tables);
    for table in &mut tables {
        table.columns.truncate(max_columns);
    }

    SchemaSnapshot::from_tables(tables)
}

/// [`build_snapshot`] bound to the process-wide guardrail settings.
#[derive(Debug, Clone)]
pub struct SchemaIntrospector {
    ignored_tables: Arc<HashSet<String>>,
    max_tables: usize,
    max_columns: usize,
}

impl SchemaIntrospector {
    pub fn new(ignored_tables: HashSet<String>, max_tables: usize, max_columns: usize) -> Self {
        Self {
            ignored_tables: Arc::new(ignored_tables),
            max_tables,
            max_columns,
        }
    }

    pub fn from_config(config: &GuardrailsConfig) -> Self {
        Self::new(
            config.ignored_table_set(),
            config.max_tables,
            config.max_columns_per_table,
        )
    }

    pub fn snapshot(&self, rows: Vec<SchemaColumn>) -> SchemaSnapshot {
        build_snapshot(rows, &self.ignored_tables, self.max_tables, self.max_columns)
    }
}
