use bookbot_llm::{ChatOptions, ChatRequest, Message, Tool, ToolCall, ToolChoice};
use serde_json::json;

#[test]
fn test_chat_request_creation() {
    let messages = vec![Message::human("Hello")];
    let request = ChatRequest::new("gpt-4o", messages);

    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.options, ChatOptions::default());
}

#[test]
fn test_chat_options_builder() {
    let tools = vec![Tool::new("test", "Test tool", json!({"type": "object"}))];

    let options = ChatOptions::new()
        .temperature(0.0)
        .max_tokens(2048)
        .n(1)
        .tools(tools)
        .tool_choice(ToolChoice::auto());

    assert_eq!(options.temperature, Some(0.0));
    assert_eq!(options.max_tokens, Some(2048));
    assert_eq!(options.n, Some(1));
    assert_eq!(options.tools.as_ref().map(Vec::len), Some(1));
    assert_eq!(options.tool_choice, Some(ToolChoice::auto()));
}

#[test]
fn test_tool_choice_serialization() {
    assert_eq!(serde_json::to_value(ToolChoice::auto()).unwrap(), json!("auto"));
    let parsed: ToolChoice = serde_json::from_value(json!("auto")).unwrap();
    assert_eq!(parsed, ToolChoice::Auto);
}

#[test]
fn test_message_roles() {
    assert_eq!(Message::system("s").role(), "system");
    assert_eq!(Message::human("u").role(), "user");
    assert_eq!(Message::ai("a").role(), "assistant");
    assert_eq!(Message::tool_result("id", "tool", "r").role(), "tool");
}

#[test]
fn test_tool_call_argument_parsing() {
    #[derive(serde::Deserialize)]
    struct Args {
        sql_query: String,
    }

    let call = ToolCall::new("call_1", "query_books_database", r#"{"sql_query":"SELECT 1"}"#);
    let args: Args = call.parse_arguments().unwrap();
    assert_eq!(args.sql_query, "SELECT 1");

    let broken = ToolCall::new("call_2", "query_books_database", "{not json");
    assert!(broken.parse_arguments::<serde_json::Value>().is_err());
}
