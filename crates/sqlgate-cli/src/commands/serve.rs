//! `sqlgate serve` - HTTP surface of the gateway.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /chat` | `{"message": "..."}` -> `{"sql", "columns", "rows", "narrative"}` |
//! | `GET /health` | Liveness check |
//!
//! An unsafe generated query answers `400`, any collaborator failure `500`;
//! both with a `{"detail": "..."}` body.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use sqlgate_core::{ChatRequest, ChatResponse, GatewayConfig};
use sqlgate_runtime::{Gateway, GatewayError};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub gateway: Gateway,
}

/// Error wrapper mapping gateway failures to HTTP responses.
pub struct ApiError(GatewayError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    state
        .gateway
        .handle(&request.message)
        .await
        .map(Json)
        .map_err(ApiError)
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "sqlgate",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn run(config: GatewayConfig, bind: Option<String>) -> anyhow::Result<()> {
    let gateway = super::build_gateway(&config)?;
    let app = create_router(Arc::new(AppState { gateway }));

    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {}: {}", addr, e))?;

    tracing::info!(addr = %addr, "sqlgate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use sqlgate_core::{QueryResult, SchemaColumn};
    use sqlgate_guard::ValidatedQuery;
    use sqlgate_runtime::{DatabaseAdapter, TextGenerator};
    use tower::ServiceExt;

    struct StubDatabase;

    #[async_trait]
    impl DatabaseAdapter for StubDatabase {
        async fn fetch_schema_metadata(&self) -> anyhow::Result<Vec<SchemaColumn>> {
            Ok(vec![SchemaColumn::new("public", "users", "email", "text")])
        }

        async fn execute(&self, _query: &ValidatedQuery) -> anyhow::Result<QueryResult> {
            Ok(QueryResult::new(
                vec!["id".to_string(), "email".to_string()],
                vec![
                    vec![json!(1), json!("a@x.com")],
                    vec![json!(2), Value::Null],
                ],
            ))
        }
    }

    struct StubGenerator(Result<&'static str, &'static str>);

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            self.0.map(str::to_string).map_err(|e| anyhow::anyhow!(e))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn app(generated: Result<&'static str, &'static str>) -> Router {
        let gateway = Gateway::new(
            &GatewayConfig::default(),
            Arc::new(StubDatabase),
            Arc::new(StubGenerator(generated)),
        );
        create_router(Arc::new(AppState { gateway }))
    }

    async fn post_chat(app: Router, message: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "message": message }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn chat_returns_masked_rows() {
        let (status, body) = post_chat(app(Ok("SELECT id, email FROM users")), "users").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sql"], "SELECT id, email FROM users LIMIT 200;");
        assert_eq!(body["columns"], json!(["id", "email"]));
        assert_eq!(body["rows"], json!([[1, "****"], [2, null]]));
        assert_eq!(body["narrative"], "Returned 2 rows.");
    }

    #[tokio::test]
    async fn unsafe_query_is_a_bad_request() {
        let (status, body) = post_chat(app(Ok("DROP TABLE users;")), "drop it").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Unsafe SQL generated: DROP TABLE users;");
    }

    #[tokio::test]
    async fn generator_failure_is_a_server_error() {
        let (status, body) = post_chat(app(Err("connection refused")), "users").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app(Ok("SELECT 1"))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
