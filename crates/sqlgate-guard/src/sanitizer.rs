//! Removal of formatting artifacts from generated text.

/// Literal markers a generator tends to wrap around its answer.
///
/// Fenced openers come before the bare fence so that `` ```sql `` is removed
/// as a whole rather than leaving a dangling `sql`.
const MARKERS: [&str; 6] = ["```sql", "```SQL", "```", "SQL:", "Sql:", "sql:"];

/// Strip every occurrence of the known markers and trim the result.
///
/// This is plain substring removal: markers may appear any number of times in
/// any position. An empty result is still returned; validation rejects it.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.to_string();
    for marker in MARKERS {
        if text.contains(marker) {
            text = text.replace(marker, "");
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_sql_code_fence() {
        assert_eq!(
            sanitize("```sql\nSELECT id, email FROM users\n```"),
            "SELECT id, email FROM users"
        );
    }

    #[test]
    fn strips_label_prefixes_in_any_case() {
        assert_eq!(sanitize("SQL: SELECT 1"), "SELECT 1");
        assert_eq!(sanitize("Sql:SELECT 1"), "SELECT 1");
        assert_eq!(sanitize("  sql:  SELECT 1  "), "SELECT 1");
    }

    #[test]
    fn strips_markers_in_the_middle() {
        assert_eq!(sanitize("SELECT 1 ``` ```"), "SELECT 1");
        assert_eq!(sanitize("```SQL\nSELECT 2\n```"), "SELECT 2");
    }

    #[test]
    fn passes_clean_text_through() {
        assert_eq!(sanitize("SELECT * FROM t"), "SELECT * FROM t");
    }

    #[test]
    fn marker_only_text_becomes_empty() {
        assert_eq!(sanitize("```sql\n```"), "");
        assert_eq!(sanitize(""), "");
    }
}
