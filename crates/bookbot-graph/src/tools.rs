use std::time::Instant;

use bookbot_llm::{Tool, ToolCall};
use bookbot_store::schema::CREATE_BOOKS_TABLE_SQL;
use bookbot_store::{BookStore, StoreError, NO_ROWS_FOUND};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::{AgentError, Result};

/// Tools the model may call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookTool {
    QueryBooksDatabase,
}

impl BookTool {
    pub const ALL: &'static [BookTool] = &[BookTool::QueryBooksDatabase];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::QueryBooksDatabase => "query_books_database",
        }
    }

    /// Declaration sent to the model with every completion request
    pub fn declaration(&self) -> Tool {
        match self {
            Self::QueryBooksDatabase => Tool::new(
                self.name(),
                format!(
                    "Execute a read-only SQL query against the books database and return \
                     the matching rows as a JSON array of objects. The database was created \
                     with:\n{CREATE_BOOKS_TABLE_SQL}\nIf nothing matches, the result is the \
                     text: {NO_ROWS_FOUND}"
                ),
                json!({
                    "type": "object",
                    "properties": {
                        "sql_query": {
                            "type": "string",
                            "description": "A single SQLite SELECT statement over the books table"
                        }
                    },
                    "required": ["sql_query"]
                }),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryBooksArgs {
    sql_query: String,
}

/// Failure of a single tool call, reported back to the model as text
#[derive(Error, Debug)]
pub enum ToolExecutionError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Tool task failed: {0}")]
    Join(String),
}

/// Resolves tool calls by name and runs them against the catalog
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    store: BookStore,
}

impl ToolRegistry {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }

    pub fn declarations(&self) -> Vec<Tool> {
        BookTool::ALL.iter().map(BookTool::declaration).collect()
    }

    /// Run a named tool with already-decoded arguments
    ///
    /// An unknown name aborts the turn. Any other failure comes back as
    /// `Ok` with the error rendered as text.
    pub async fn dispatch(&self, name: &str, arguments: &Value) -> Result<String> {
        let tool = BookTool::from_name(name).ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;
        Ok(render(self.execute(tool, arguments.clone()).await))
    }

    /// Run a tool call exactly as the model produced it
    pub async fn dispatch_call(&self, call: &ToolCall) -> Result<String> {
        let tool = BookTool::from_name(call.name())
            .ok_or_else(|| AgentError::UnknownTool(call.name().to_string()))?;

        let result = match call.parse_arguments::<Value>() {
            Ok(arguments) => self.execute(tool, arguments).await,
            Err(e) => Err(ToolExecutionError::InvalidArguments(e.to_string())),
        };
        Ok(render(result))
    }

    async fn execute(
        &self,
        tool: BookTool,
        arguments: Value,
    ) -> std::result::Result<String, ToolExecutionError> {
        let start = Instant::now();

        let result = match tool {
            BookTool::QueryBooksDatabase => {
                let args: QueryBooksArgs = serde_json::from_value(arguments)
                    .map_err(|e| ToolExecutionError::InvalidArguments(e.to_string()))?;
                tracing::debug!(sql = %args.sql_query, "Running catalog query");

                let store = self.store.clone();
                tokio::task::spawn_blocking(move || {
                    store
                        .execute_read_query(&args.sql_query)
                        .and_then(|outcome| outcome.to_tool_content())
                })
                .await
                .map_err(|e| ToolExecutionError::Join(e.to_string()))?
                .map_err(ToolExecutionError::from)
            }
        };

        tracing::info!(
            tool = tool.name(),
            success = result.is_ok(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tool executed"
        );

        result
    }
}

fn render(result: std::result::Result<String, ToolExecutionError>) -> String {
    match result {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(error = %e, "Tool call failed");
            format!("Tool execution failed: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names_only() {
        assert_eq!(
            BookTool::from_name("query_books_database"),
            Some(BookTool::QueryBooksDatabase)
        );
        assert_eq!(BookTool::from_name("drop_everything"), None);
    }

    #[test]
    fn declaration_requires_sql_query() {
        let tool = BookTool::QueryBooksDatabase.declaration();
        assert_eq!(tool.name(), "query_books_database");
        assert_eq!(tool.function.parameters["required"], json!(["sql_query"]));
        assert_eq!(
            tool.function.parameters["properties"]["sql_query"]["type"],
            "string"
        );

        let description = tool.function.description.unwrap();
        assert!(description.contains("CREATE TABLE IF NOT EXISTS books"));
        assert!(description.contains(NO_ROWS_FOUND));
    }

    #[tokio::test]
    async fn unknown_tool_is_fatal() {
        let registry = ToolRegistry::new(BookStore::new("unused.db"));
        let err = registry.dispatch("nope", &json!({})).await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(name) if name == "nope"));
    }

    #[tokio::test]
    async fn missing_argument_becomes_error_text() {
        let registry = ToolRegistry::new(BookStore::new("unused.db"));
        let text = registry
            .dispatch("query_books_database", &json!({"query": "SELECT 1"}))
            .await
            .unwrap();
        assert!(text.starts_with("Tool execution failed: Invalid arguments"));
    }

    #[tokio::test]
    async fn malformed_json_arguments_become_error_text() {
        let registry = ToolRegistry::new(BookStore::new("unused.db"));
        let call = ToolCall::new("call_1", "query_books_database", "{not json");
        let text = registry.dispatch_call(&call).await.unwrap();
        assert!(text.starts_with("Tool execution failed: Invalid arguments"));
    }
}
