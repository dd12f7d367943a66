//! Gateway tests driven by deterministic fake collaborators.
//!
//! Run with: cargo test -p sqlgate-runtime --test gateway

use async_trait::async_trait;
use serde_json::json;
use sqlgate_core::{GatewayConfig, QueryResult, SchemaColumn, ValidationMode};
use sqlgate_guard::ValidatedQuery;
use sqlgate_runtime::{DatabaseAdapter, Gateway, GatewayError, TextGenerator};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// FAKES
// =============================================================================

/// Records every query it is asked to execute.
struct FakeDatabase {
    metadata: Vec<SchemaColumn>,
    result: Result<QueryResult, String>,
    executed: Mutex<Vec<String>>,
    metadata_fails: bool,
}

impl FakeDatabase {
    fn returning(result: QueryResult) -> Self {
        Self {
            metadata: vec![
                SchemaColumn::new("public", "users", "id", "int"),
                SchemaColumn::new("public", "users", "email", "text"),
            ],
            result: Ok(result),
            executed: Mutex::new(Vec::new()),
            metadata_fails: false,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            ..Self::returning(QueryResult::default())
        }
    }

    fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl DatabaseAdapter for FakeDatabase {
    async fn fetch_schema_metadata(&self) -> anyhow::Result<Vec<SchemaColumn>> {
        if self.metadata_fails {
            anyhow::bail!("connection refused");
        }
        Ok(self.metadata.clone())
    }

    async fn execute(&self, query: &ValidatedQuery) -> anyhow::Result<QueryResult> {
        self.executed.lock().unwrap().push(query.to_string());
        self.result.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

/// Returns a fixed completion and remembers the prompt it saw.
struct FakeGenerator {
    response: Result<String, String>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn answering(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            ..Self::answering("")
        }
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(|e| anyhow::anyhow!(e))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn gateway(
    config: &GatewayConfig,
    database: &Arc<FakeDatabase>,
    generator: &Arc<FakeGenerator>,
) -> Gateway {
    Gateway::new(config, database.clone(), generator.clone())
}

fn users_result() -> QueryResult {
    QueryResult::new(
        vec!["id".to_string(), "email".to_string()],
        vec![vec![json!(1), json!("a@x.com")]],
    )
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test]
async fn fenced_select_is_limited_executed_and_masked() {
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("```sql\nSELECT id, email FROM users\n```"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    let response = gw.handle("show me the users").await.unwrap();

    assert_eq!(response.sql, "SELECT id, email FROM users LIMIT 200;");
    assert_eq!(response.columns, vec!["id".to_string(), "email".to_string()]);
    assert_eq!(response.rows, vec![vec![json!(1), json!("****")]]);
    assert_eq!(response.narrative, "Returned 1 rows.");
    assert_eq!(database.executed(), vec!["SELECT id, email FROM users LIMIT 200;".to_string()]);
}

#[tokio::test]
async fn prompt_embeds_schema_and_message() {
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("SELECT 1"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    gw.handle("show me the users").await.unwrap();

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("TABLE public.users -> id (int), email (text)"));
    assert!(prompt.contains("show me the users"));
}

#[tokio::test]
async fn drop_is_rejected_before_execution() {
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("DROP TABLE users;"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    let err = gw.handle("delete everything").await.unwrap_err();

    assert!(err.is_client_error());
    match err {
        GatewayError::UnsafeQuery { query, .. } => assert_eq!(query, "DROP TABLE users;"),
        other => panic!("expected UnsafeQuery, got {:?}", other),
    }
    assert!(database.executed().is_empty());
}

#[tokio::test]
async fn identifier_false_positive_is_rejected() {
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("SELECT * FROM updates"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    assert!(matches!(
        gw.handle("show updates").await,
        Err(GatewayError::UnsafeQuery { .. })
    ));
    assert!(database.executed().is_empty());
}

#[tokio::test]
async fn compatible_mode_forwards_trailing_statements() {
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("SELECT 1 LIMIT 1; VACUUM"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    gw.handle("one").await.unwrap();
    assert_eq!(database.executed(), vec!["SELECT 1 LIMIT 1; VACUUM".to_string()]);
}

#[tokio::test]
async fn strict_mode_rejects_trailing_statements() {
    let mut config = GatewayConfig::default();
    config.guardrails.validation_mode = ValidationMode::Strict;
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("SELECT 1 LIMIT 1; VACUUM"));
    let gw = gateway(&config, &database, &generator);

    let err = gw.handle("one").await.unwrap_err();
    assert!(err.is_client_error());
    assert!(database.executed().is_empty());
}

#[tokio::test]
async fn generation_failure_is_a_server_error() {
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::failing("503 Service Unavailable"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    let err = gw.handle("anything").await.unwrap_err();

    assert!(!err.is_client_error());
    assert!(matches!(err, GatewayError::GenerationFailed(ref m) if m.contains("503")));
    assert!(database.executed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_generation_times_out() {
    let mut config = GatewayConfig::default();
    config.generator.timeout_seconds = 1;
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator {
        delay: Some(Duration::from_secs(30)),
        ..FakeGenerator::answering("SELECT 1")
    });
    let gw = gateway(&config, &database, &generator);

    let err = gw.handle("anything").await.unwrap_err();

    assert!(matches!(err, GatewayError::GenerationFailed(ref m) if m.contains("timed out")));
    assert!(database.executed().is_empty());
}

#[tokio::test]
async fn execution_failure_carries_database_message() {
    let database = Arc::new(FakeDatabase::failing("relation \"users\" does not exist"));
    let generator = Arc::new(FakeGenerator::answering("SELECT * FROM users"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    let err = gw.handle("users").await.unwrap_err();

    assert!(!err.is_client_error());
    assert_eq!(err.to_string(), "DB error: relation \"users\" does not exist");
}

#[tokio::test]
async fn schema_failure_stops_before_generation() {
    let database = Arc::new(FakeDatabase {
        metadata_fails: true,
        ..FakeDatabase::returning(users_result())
    });
    let generator = Arc::new(FakeGenerator::answering("SELECT 1"));
    let gw = gateway(&GatewayConfig::default(), &database, &generator);

    let err = gw.handle("users").await.unwrap_err();

    assert!(matches!(err, GatewayError::SchemaUnavailable(_)));
    assert!(generator.last_prompt().is_none());
}

#[tokio::test]
async fn ignored_tables_never_reach_the_prompt() {
    let mut config = GatewayConfig::default();
    config.guardrails.ignored_tables = vec!["public.users".to_string()];
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("SELECT 1"));
    let gw = gateway(&config, &database, &generator);

    assert!(gw.snapshot().await.unwrap().is_empty());
    gw.handle("users").await.unwrap();
    assert!(!generator.last_prompt().unwrap().contains("public.users"));
}

#[tokio::test]
async fn concurrent_requests_share_one_gateway() {
    let database = Arc::new(FakeDatabase::returning(users_result()));
    let generator = Arc::new(FakeGenerator::answering("SELECT id, email FROM users"));
    let gw = Arc::new(gateway(&GatewayConfig::default(), &database, &generator));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let gw = gw.clone();
            tokio::spawn(async move { gw.handle(&format!("request {}", i)).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.rows[0][1], json!("****"));
    }
    assert_eq!(database.executed().len(), 8);
}
