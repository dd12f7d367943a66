//! Generation prompt assembly.

use sqlgate_core::SchemaSnapshot;
use sqlgate_guard::FORBIDDEN_KEYWORDS;

/// Builds the instruction text sent to the generator.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    default_limit: u64,
}

impl PromptBuilder {
    pub fn new(default_limit: u64) -> Self {
        Self { default_limit }
    }

    /// One `TABLE <key> -> col (type), ...` line per table.
    pub fn render_schema(snapshot: &SchemaSnapshot) -> String {
        snapshot
            .tables()
            .iter()
            .map(|table| {
                let columns: Vec<String> = table
                    .columns
                    .iter()
                    .map(|c| format!("{} ({})", c.column_name, c.data_type))
                    .collect();
                format!("TABLE {} -> {}", table.key, columns.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Wrap the schema in the fixed rule block and append the user's message
    /// verbatim.
    pub fn build(&self, snapshot: &SchemaSnapshot, user_message: &str) -> String {
        let forbidden = FORBIDDEN_KEYWORDS
            .iter()
            .map(|kw| kw.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"You are an assistant that translates requests into PostgreSQL queries.

TASK:
Given a user request, output exactly ONE valid PostgreSQL SELECT statement.

HARD RULES:
1. Output ONLY the SQL statement. No explanation, no markdown, no backticks.
2. Use ONLY the tables and columns listed in the schema below.
3. Never generate {forbidden}.
4. If the user does not ask for a specific number of rows, add LIMIT {limit}.
5. Prefer explicit JOIN clauses.
6. When a column looks like an identifier (id, *_id), join on it.

SCHEMA:
{schema}

User request: {message}
SQL:"#,
            forbidden = forbidden,
            limit = self.default_limit,
            schema = Self::render_schema(snapshot),
            message = user_message,
        )
    }
}
