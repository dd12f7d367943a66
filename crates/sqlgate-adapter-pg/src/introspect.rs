use sqlgate_core::SchemaColumn;
use sqlx::{PgPool, Row};

/// Column metadata for every user table, ordered by schema, table and
/// ordinal position. Excludes system schemas (pg_catalog, information_schema).
pub async fn fetch_columns(pool: &PgPool) -> anyhow::Result<Vec<SchemaColumn>> {
    let rows = sqlx::query(
        r#"
        select table_schema::text as table_schema,
               table_name::text as table_name,
               column_name::text as column_name,
               data_type::text as data_type
        from information_schema.columns
        where table_schema not in ('information_schema', 'pg_catalog')
        order by table_schema, table_name, ordinal_position
        "#,
    )
    .fetch_all(pool)
    .await?;

    let columns = rows
        .into_iter()
        .map(|row| {
            Ok(SchemaColumn {
                schema_name: row.try_get("table_schema")?,
                table_name: row.try_get("table_name")?,
                column_name: row.try_get("column_name")?,
                data_type: row.try_get("data_type")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    tracing::debug!(columns = columns.len(), "Fetched schema metadata");
    Ok(columns)
}
