//! The full admission path for generated text.

use crate::error::GuardError;
use crate::limit::ensure_limit;
use crate::sanitizer::sanitize;
use crate::validator::SafetyValidator;
use sqlgate_core::{GuardrailsConfig, ValidationMode};
use std::fmt;

/// A query that passed validation and carries a row limit.
///
/// This is the only form handed to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery(String);

impl ValidatedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sanitize, validate and limit generated text in one step.
#[derive(Debug, Clone, Copy)]
pub struct SafetyGate {
    validator: SafetyValidator,
    default_limit: u64,
}

impl SafetyGate {
    pub fn new(mode: ValidationMode, default_limit: u64) -> Self {
        Self {
            validator: SafetyValidator::new(mode),
            default_limit,
        }
    }

    pub fn from_config(config: &GuardrailsConfig) -> Self {
        Self::new(config.validation_mode, config.default_limit)
    }

    /// Turn raw generator output into a [`ValidatedQuery`], or reject it.
    pub fn admit(&self, raw: &str) -> Result<ValidatedQuery, GuardError> {
        let candidate = sanitize(raw);
        let verdict = self.validator.verdict(&candidate);

        if !verdict.is_safe() {
            tracing::debug!(candidate = %candidate, reason = %verdict, "Rejected generated query");
            return Err(GuardError::UnsafeQuery {
                query: candidate,
                verdict,
            });
        }

        let limited = ensure_limit(&candidate, self.default_limit);
        if limited != candidate {
            tracing::debug!(query = %limited, "Appended default row limit");
        }
        Ok(ValidatedQuery(limited))
    }
}
