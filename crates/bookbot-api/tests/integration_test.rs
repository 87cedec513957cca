use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bookbot_api::{build_router, config::Config, state::AppState};
use bookbot_graph::{Graph, GraphConfig, LLMConfig};
use bookbot_llm::{ChatClient, ChatRequest, ChatResponse, ToolCall};
use bookbot_store::{BookRecord, BookStore, BookWriter};
use serde_json::{json, Value};
use tower::ServiceExt;

struct ScriptedClient {
    responses: Mutex<VecDeque<anyhow::Result<ChatResponse>>>,
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
    }
}

fn test_config(db_path: &Path) -> Config {
    let toml = format!(
        r#"
        [server]
        host = "127.0.0.1"
        port = 0

        [cors]
        enabled = false
        origins = []

        [llm]
        model = "gpt-4o-mini"

        [database]
        path = "{}"

        [logging]
        level = "debug"
        format = "pretty"
        "#,
        db_path.display()
    );
    toml::from_str(&toml).unwrap()
}

/// Never answers within any test's patience
struct StalledClient;

#[async_trait]
impl ChatClient for StalledClient {
    async fn chat(&self, _request: ChatRequest) -> anyhow::Result<ChatResponse> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(ChatResponse::text("too late"))
    }
}

fn app(db_path: &Path, responses: Vec<anyhow::Result<ChatResponse>>) -> Router {
    let client = Arc::new(ScriptedClient {
        responses: Mutex::new(responses.into()),
    });
    app_with(test_config(db_path), db_path, client)
}

fn app_with(config: Config, db_path: &Path, client: Arc<dyn ChatClient>) -> Router {
    let graph = Graph::builder()
        .chat_client(client)
        .store(BookStore::new(db_path))
        .llm_config(LLMConfig::new(config.llm.model.clone()))
        .config(GraphConfig::new().with_max_tool_rounds(config.llm.max_tool_rounds))
        .build()
        .unwrap();
    build_router(Arc::new(AppState::new(config, graph)))
}

fn seed(path: &Path) {
    let mut writer = BookWriter::open(path).unwrap();
    writer.create_schema_if_absent().unwrap();
    writer
        .insert_records(&[BookRecord::new(
            "Moby Dick",
            9.99,
            4,
            "In stock (3 available)",
            "A whale of a tale.",
            "Classics",
            3,
        )])
        .unwrap();
}

fn ask_request(question: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "question": question }).to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");
    seed(&path);

    let response = app(&path, Vec::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["database"], "available");
}

#[tokio::test]
async fn ask_runs_a_tool_round_and_returns_the_answer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");
    seed(&path);

    let responses = vec![
        Ok(ChatResponse::tool_calls(vec![ToolCall::new(
            "call_1",
            "query_books_database",
            json!({ "sql_query": "SELECT COUNT(*) FROM books WHERE category = 'Classics'" })
                .to_string(),
        )])),
        Ok(ChatResponse::text("# Answer:\nOne classic.")),
    ];

    let response = app(&path, responses)
        .oneshot(ask_request("How many classics?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "answer": "# Answer:\nOne classic." }));
}

#[tokio::test]
async fn empty_question_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");

    let response = app(&path, Vec::new())
        .oneshot(ask_request("   "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");
    seed(&path);

    let response = app(&path, vec![Err(anyhow::anyhow!("OpenAI API error (500): boom"))])
        .oneshot(ask_request("Anything?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn unknown_tool_maps_to_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");
    seed(&path);

    let responses = vec![Ok(ChatResponse::tool_calls(vec![ToolCall::new(
        "call_1",
        "order_pizza",
        "{}",
    )]))];

    let response = app(&path, responses)
        .oneshot(ask_request("Lunch?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Unknown tool: order_pizza");
}

#[tokio::test]
async fn slow_turn_times_out_with_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");
    seed(&path);

    let mut config = test_config(&path);
    config.server.request_timeout_secs = 1;
    config.llm.timeout_secs = None;

    let response = app_with(config, &path, Arc::new(StalledClient))
        .oneshot(ask_request("Anything?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(json_body(response).await, json!({ "error": "Request timed out" }));
}
