//! Error types for request orchestration.

use sqlgate_guard::GuardError;
use thiserror::Error;

/// Terminal failure of one gateway request. Nothing is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Schema metadata could not be fetched.
    #[error("schema unavailable: {0}")]
    SchemaUnavailable(String),

    /// The text-generation service failed or timed out.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// The generated query was rejected by the safety gate and not executed.
    #[error("Unsafe SQL generated: {query}")]
    UnsafeQuery { query: String, reason: String },

    /// The database rejected or failed the validated query.
    #[error("DB error: {0}")]
    ExecutionFailed(String),
}

impl GatewayError {
    /// `true` for failures caused by the request's content rather than by a
    /// collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GatewayError::UnsafeQuery { .. })
    }
}

impl From<GuardError> for GatewayError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::UnsafeQuery { query, verdict } => GatewayError::UnsafeQuery {
                query,
                reason: verdict.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgate_guard::Verdict;

    #[test]
    fn only_unsafe_query_is_a_client_error() {
        let unsafe_query: GatewayError = GuardError::UnsafeQuery {
            query: "DROP TABLE users;".to_string(),
            verdict: Verdict::Forbidden { keyword: "drop" },
        }
        .into();

        assert!(unsafe_query.is_client_error());
        assert_eq!(unsafe_query.to_string(), "Unsafe SQL generated: DROP TABLE users;");
        assert!(!GatewayError::GenerationFailed("timeout".into()).is_client_error());
        assert!(!GatewayError::ExecutionFailed("syntax".into()).is_client_error());
        assert!(!GatewayError::SchemaUnavailable("refused".into()).is_client_error());
    }
}
