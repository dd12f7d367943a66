//! Text-generation service configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the Ollama-compatible generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL of the service, e.g. `http://localhost:11434`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name passed with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound for a single generation call.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_timeout() -> u64 {
    60
}
