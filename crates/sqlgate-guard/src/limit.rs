//! Row-count ceiling enforcement.

/// Ensure `candidate` carries a row limit.
///
/// If `limit` already occurs anywhere in the text (case-insensitive) the text
/// is returned unchanged. Otherwise one trailing `;` is dropped and
/// ` LIMIT <default_limit>;` is appended. Applying this to its own output is a
/// no-op.
///
/// The clause is appended as text. When the candidate ends in a `--` comment
/// the clause lands inside it and the query runs without a ceiling; strict
/// validation rejects such candidates before they get here.
pub fn ensure_limit(candidate: &str, default_limit: u64) -> String {
    if candidate.to_lowercase().contains("limit") {
        return candidate.to_string();
    }

    let body = candidate.strip_suffix(';').unwrap_or(candidate);
    format!("{} LIMIT {};", body, default_limit)
}
