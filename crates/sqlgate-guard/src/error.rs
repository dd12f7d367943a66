//! Error types for the guard crate.

use crate::validator::Verdict;
use thiserror::Error;

/// Errors raised by the safety gate.
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    /// The candidate query failed validation and must not be executed.
    #[error("Unsafe SQL generated: {query}")]
    UnsafeQuery {
        /// The sanitized text that was rejected.
        query: String,
        /// Why it was rejected.
        verdict: Verdict,
    },
}
