//! # sqlgate-guard
//!
//! The safety gate between a text-generation service and the database.
//!
//! Generated text never reaches the database directly. It is:
//!
//! 1. **Sanitized**: formatting markers (code fences, `SQL:` labels) removed
//! 2. **Validated**: rejected if it mentions a forbidden operation keyword
//!    anywhere, or if its first statement does not start with `select`
//! 3. **Limited**: a `LIMIT` clause appended when none is present
//!
//! and results coming back are **masked** before they leave the system:
//!
//! ```text
//! generator text ──► sanitize ──► validate ──► ensure_limit ──► database
//!                                    │
//!                                    └─ reject (never executed)
//!
//! database rows  ──► mask sensitive columns ──► caller
//! ```
//!
//! ## Known false positives
//!
//! The denylist matches substrings, not tokens: `SELECT * FROM updates` is
//! rejected because it contains `update`. This is kept on purpose for
//! behavioral compatibility; see [`validator`].

pub mod error;
pub mod gate;
pub mod limit;
pub mod masker;
pub mod sanitizer;
pub mod validator;

pub use error::GuardError;
pub use gate::{SafetyGate, ValidatedQuery};
pub use limit::ensure_limit;
pub use masker::ResultMasker;
pub use sanitizer::sanitize;
pub use validator::{FORBIDDEN_KEYWORDS, SafetyValidator, Verdict};
