//! CLI command implementations for sqlgate.

pub mod ask;
pub mod check;
pub mod schema;
pub mod serve;

use sqlgate_adapter_pg::PostgresAdapter;
use sqlgate_core::GatewayConfig;
use sqlgate_ollama::OllamaGenerator;
use sqlgate_runtime::Gateway;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_CONFIG_FILE: &str = "sqlgate.yaml";

/// Load the configuration file (explicit path, else `./sqlgate.yaml` when it
/// exists, else defaults) and apply environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GatewayConfig> {
    let mut config = match path {
        Some(path) => GatewayConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("failed to load {}: {}", path.display(), e))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            GatewayConfig::from_file(DEFAULT_CONFIG_FILE)?
        }
        None => GatewayConfig::default(),
    };

    config.apply_env_overrides()?;
    Ok(config)
}

/// Wire the live collaborators into a gateway.
pub fn build_gateway(config: &GatewayConfig) -> anyhow::Result<Gateway> {
    let database = Arc::new(PostgresAdapter::from_config(&config.upstream)?);
    let generator = Arc::new(OllamaGenerator::from_config(&config.generator)?);

    tracing::info!(
        model = %config.generator.model,
        generator_url = %config.generator.base_url,
        mode = ?config.guardrails.validation_mode,
        "Gateway configured"
    );

    Ok(Gateway::new(config, database, generator))
}
