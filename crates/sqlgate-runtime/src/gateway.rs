//! Per-request orchestration.

use crate::adapter::{DatabaseAdapter, TextGenerator};
use crate::error::GatewayError;
use crate::introspect::SchemaIntrospector;
use crate::prompt::PromptBuilder;
use sqlgate_core::{ChatResponse, GatewayConfig, SchemaSnapshot};
use sqlgate_guard::{ResultMasker, SafetyGate, ValidatedQuery};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// Turns a natural-language message into a masked query result.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct Gateway {
    database: Arc<dyn DatabaseAdapter>,
    generator: Arc<dyn TextGenerator>,
    introspector: SchemaIntrospector,
    prompt: PromptBuilder,
    gate: SafetyGate,
    masker: ResultMasker,
    generation_timeout: Duration,
    query_timeout: Duration,
}

impl Gateway {
    pub fn new(
        config: &GatewayConfig,
        database: Arc<dyn DatabaseAdapter>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let guardrails = &config.guardrails;
        Self {
            database,
            generator,
            introspector: SchemaIntrospector::from_config(guardrails),
            prompt: PromptBuilder::new(guardrails.default_limit),
            gate: SafetyGate::from_config(guardrails),
            masker: ResultMasker::from_config(guardrails),
            generation_timeout: Duration::from_secs(config.generator.timeout_seconds),
            query_timeout: Duration::from_secs(guardrails.query_timeout_seconds),
        }
    }

    /// Fetch metadata and build a fresh snapshot.
    pub async fn snapshot(&self) -> Result<SchemaSnapshot, GatewayError> {
        let rows = bounded(self.query_timeout, self.database.fetch_schema_metadata())
            .await
            .map_err(GatewayError::SchemaUnavailable)?;
        Ok(self.introspector.snapshot(rows))
    }

    /// Handle one message end to end.
    pub async fn handle(&self, message: &str) -> Result<ChatResponse, GatewayError> {
        let span = tracing::info_span!("chat", request_id = %Uuid::new_v4());
        self.handle_inner(message).instrument(span).await
    }

    async fn handle_inner(&self, message: &str) -> Result<ChatResponse, GatewayError> {
        let snapshot = self.snapshot().await?;
        tracing::debug!(tables = snapshot.len(), "Built schema snapshot");

        let prompt = self.prompt.build(&snapshot, message);

        let generated = bounded(self.generation_timeout, self.generator.generate(&prompt))
            .await
            .map_err(|e| {
                tracing::warn!(generator = self.generator.name(), error = %e, "Generation failed");
                GatewayError::GenerationFailed(e)
            })?;

        let query: ValidatedQuery = self.gate.admit(&generated).map_err(|e| {
            tracing::warn!(error = %e, "Generated query rejected");
            GatewayError::from(e)
        })?;

        let result = bounded(self.query_timeout, self.database.execute(&query))
            .await
            .map_err(|e| {
                tracing::warn!(query = %query, error = %e, "Query execution failed");
                GatewayError::ExecutionFailed(e)
            })?;

        let masked = self.masker.mask(result);
        tracing::info!(query = %query, rows = masked.row_count(), "Query executed");

        Ok(ChatResponse::new(query.into_string(), masked))
    }
}

/// Await a collaborator call with an upper bound, flattening both failure
/// kinds into a message.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, String>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(format!("{:#}", e)),
        Err(_) => Err(format!("timed out after {}s", limit.as_secs())),
    }
}
