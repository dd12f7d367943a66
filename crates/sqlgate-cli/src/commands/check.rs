//! `sqlgate check` - run the safety gate offline.
//!
//! Prints the sanitized candidate, the verdict and, when accepted, the query
//! that would be executed. Exits non-zero when the text is rejected.

use sqlgate_core::{GatewayConfig, ValidationMode};
use sqlgate_guard::{GuardError, SafetyGate, sanitize};

pub fn run(config: &GatewayConfig, sql: &str, strict: bool) -> anyhow::Result<()> {
    let mode = if strict {
        ValidationMode::Strict
    } else {
        config.guardrails.validation_mode
    };
    let gate = SafetyGate::new(mode, config.guardrails.default_limit);

    println!("mode:      {:?}", mode);
    println!("candidate: {}", sanitize(sql));

    match gate.admit(sql) {
        Ok(query) => {
            println!("verdict:   safe");
            println!("execute:   {}", query);
            Ok(())
        }
        Err(GuardError::UnsafeQuery { verdict, .. }) => {
            println!("verdict:   rejected ({})", verdict);
            Err(anyhow::anyhow!("query rejected"))
        }
    }
}
