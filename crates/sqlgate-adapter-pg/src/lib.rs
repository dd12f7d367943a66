use async_trait::async_trait;
use sqlgate_core::{QueryResult, SchemaColumn, UpstreamConfig};
use sqlgate_guard::ValidatedQuery;
use sqlgate_runtime::DatabaseAdapter;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Executor, Postgres, Row, Statement, Transaction};
use std::time::Duration;

pub mod introspect;
pub mod value;

#[derive(Debug, Clone, Copy)]
pub struct PostgresAdapterOptions {
    /// Wrap every query in a `READ ONLY` transaction that is rolled back.
    pub read_only_transaction: bool,
}

impl Default for PostgresAdapterOptions {
    fn default() -> Self {
        Self {
            read_only_transaction: true,
        }
    }
}

/// Executes validated queries against PostgreSQL.
///
/// Queries go through the extended protocol (a prepared statement), which
/// Postgres refuses for text containing more than one command.
pub struct PostgresAdapter {
    pool: PgPool,
    options: PostgresAdapterOptions,
}

impl PostgresAdapter {
    /// Connect lazily using the upstream section of the configuration.
    pub fn from_config(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_seconds))
            .connect_lazy(&config.connection_string())?;
        Ok(Self {
            pool,
            options: PostgresAdapterOptions {
                read_only_transaction: config.read_only_transaction,
            },
        })
    }

    async fn execute_read_only(&self, sql: &str) -> anyhow::Result<QueryResult> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query(sql).fetch_all(&mut *tx).await?;
        let columns = match rows.first() {
            Some(row) => column_names(row),
            None => {
                let statement = (&mut *tx).prepare(sql).await?;
                statement.columns().iter().map(|c| c.name().to_string()).collect()
            }
        };

        tx.rollback().await?;
        Ok(QueryResult::new(columns, rows.iter().map(value::row_values).collect()))
    }

    async fn execute_direct(&self, sql: &str) -> anyhow::Result<QueryResult> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        let columns = match rows.first() {
            Some(row) => column_names(row),
            None => {
                let statement = (&self.pool).prepare(sql).await?;
                statement.columns().iter().map(|c| c.name().to_string()).collect()
            }
        };

        Ok(QueryResult::new(columns, rows.iter().map(value::row_values).collect()))
    }
}

#[async_trait]
impl DatabaseAdapter for PostgresAdapter {
    async fn fetch_schema_metadata(&self) -> anyhow::Result<Vec<SchemaColumn>> {
        introspect::fetch_columns(&self.pool).await
    }

    async fn execute(&self, query: &ValidatedQuery) -> anyhow::Result<QueryResult> {
        tracing::debug!(query = %query, read_only = self.options.read_only_transaction, "Executing query");

        if self.options.read_only_transaction {
            self.execute_read_only(query.as_str()).await
        } else {
            self.execute_direct(query.as_str()).await
        }
    }
}

fn column_names(row: &PgRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}
