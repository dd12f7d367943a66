//! `sqlgate schema` - show what the generator is told about the database.

use sqlgate_adapter_pg::PostgresAdapter;
use sqlgate_core::GatewayConfig;
use sqlgate_runtime::{DatabaseAdapter, PromptBuilder, SchemaIntrospector};

pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let database = PostgresAdapter::from_config(&config.upstream)?;
    let rows = database.fetch_schema_metadata().await?;

    let snapshot = SchemaIntrospector::from_config(&config.guardrails).snapshot(rows);
    if snapshot.is_empty() {
        eprintln!("No tables visible (check ignored_tables and database permissions).");
        return Ok(());
    }

    println!("{}", PromptBuilder::render_schema(&snapshot));
    Ok(())
}
