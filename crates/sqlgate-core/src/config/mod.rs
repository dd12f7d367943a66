//! Configuration types for sqlgate.
//!
//! A single [`GatewayConfig`] is loaded once at startup (YAML file, then
//! environment overrides) and shared immutably with every component.
//!
//! # Sections
//!
//! - **upstream**: PostgreSQL connection and pool settings
//! - **generator**: text-generation service endpoint and model
//! - **guardrails**: row limit, prompt bounds, ignored tables, masked columns
//! - **server**: HTTP bind address

pub mod generator;
pub mod guardrails;
pub mod server;
pub mod upstream;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use generator::GeneratorConfig;
pub use guardrails::{GuardrailsConfig, ValidationMode};
pub use server::ServerConfig;
pub use upstream::{ConnectionPoolConfig, SslMode, UpstreamConfig};

/// Complete sqlgate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Upstream Postgres connection.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Text-generation service.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Safety gate settings.
    #[serde(default)]
    pub guardrails: GuardrailsConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Recognized variables: `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASS`,
    /// `DB_NAME`, `OLLAMA_HOST`, `OLLAMA_MODEL` and `IGNORE_TABLES`
    /// (comma-separated `schema.table` keys).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DB_HOST") {
            self.upstream.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            self.upstream.port = port
                .parse()
                .map_err(|_| ConfigError::Config(format!("DB_PORT is not a valid port: {}", port)))?;
        }
        if let Some(user) = lookup("DB_USER") {
            self.upstream.username = user;
        }
        if let Some(password) = lookup("DB_PASS") {
            self.upstream.password = Some(password);
        }
        if let Some(database) = lookup("DB_NAME") {
            self.upstream.database = database;
        }
        if let Some(base_url) = lookup("OLLAMA_HOST") {
            self.generator.base_url = base_url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.generator.model = model;
        }
        if let Some(tables) = lookup("IGNORE_TABLES") {
            self.guardrails.ignored_tables = tables
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }

        self.validate()
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guardrails.default_limit == 0 {
            return Err(ConfigError::Config(
                "guardrails.default_limit must be greater than zero".to_string(),
            ));
        }
        if self.guardrails.mask_token.is_empty() {
            return Err(ConfigError::Config(
                "guardrails.mask_token must not be empty".to_string(),
            ));
        }
        if self.generator.model.trim().is_empty() {
            return Err(ConfigError::Config("generator.model must be set".to_string()));
        }
        Ok(())
    }
}
