//! Decoding of Postgres cells into JSON values.

use bigdecimal::BigDecimal;
use serde_json::{Value, json};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Decode every cell of `row`, in projection order.
pub fn row_values(row: &PgRow) -> Vec<Value> {
    (0..row.columns().len()).map(|idx| cell_value(row, idx)).collect()
}

/// Decode one cell. SQL NULL becomes JSON null; types without a mapping fall
/// back to their text form, or to a `<type>` placeholder.
pub fn cell_value(row: &PgRow, idx: usize) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(_) => {}
        Err(_) => return Value::String("<unreadable>".to_string()),
    }

    let type_name = row.columns()[idx].type_info().name().to_string();
    decode_as(row, idx, &type_name).unwrap_or_else(|| {
        row.try_get::<String, _>(idx)
            .map(Value::String)
            .unwrap_or_else(|_| Value::String(format!("<{}>", type_name.to_lowercase())))
    })
}

fn decode_as(row: &PgRow, idx: usize, type_name: &str) -> Option<Value> {
    let value = match type_name {
        "INT2" => json!(row.try_get::<i16, _>(idx).ok()?),
        "INT4" => json!(row.try_get::<i32, _>(idx).ok()?),
        "INT8" => json!(row.try_get::<i64, _>(idx).ok()?),
        "FLOAT4" => json!(row.try_get::<f32, _>(idx).ok()?),
        "FLOAT8" => json!(row.try_get::<f64, _>(idx).ok()?),
        "NUMERIC" => json!(row.try_get::<BigDecimal, _>(idx).ok()?.to_string()),
        "BOOL" => json!(row.try_get::<bool, _>(idx).ok()?),
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx).ok()?,
        "UUID" => json!(row.try_get::<uuid::Uuid, _>(idx).ok()?.to_string()),
        "DATE" => json!(row.try_get::<chrono::NaiveDate, _>(idx).ok()?.to_string()),
        "TIME" => json!(row.try_get::<chrono::NaiveTime, _>(idx).ok()?.to_string()),
        "TIMESTAMP" => json!(row.try_get::<chrono::NaiveDateTime, _>(idx).ok()?.to_string()),
        "TIMESTAMPTZ" => json!(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx)
                .ok()?
                .to_rfc3339()
        ),
        "TEXT[]" | "VARCHAR[]" => json!(row.try_get::<Vec<String>, _>(idx).ok()?),
        "INT4[]" => json!(row.try_get::<Vec<i32>, _>(idx).ok()?),
        "INT8[]" => json!(row.try_get::<Vec<i64>, _>(idx).ok()?),
        _ => return None,
    };
    Some(value)
}
