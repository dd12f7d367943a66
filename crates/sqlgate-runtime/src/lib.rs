//! # sqlgate-runtime
//!
//! Sequences one natural-language request through the gateway:
//!
//! ```text
//! message ─► schema snapshot ─► prompt ─► generator ─► safety gate ─► database ─► masker ─► response
//! ```
//!
//! The generator and the database are reached only through the
//! [`TextGenerator`] and [`DatabaseAdapter`] traits, so the whole flow can be
//! driven by deterministic fakes.

pub mod adapter;
pub mod error;
pub mod gateway;
pub mod introspect;
pub mod prompt;

pub use adapter::{DatabaseAdapter, TextGenerator};
pub use error::GatewayError;
pub use gateway::Gateway;
pub use introspect::{SchemaIntrospector, build_snapshot};
pub use prompt::PromptBuilder;
