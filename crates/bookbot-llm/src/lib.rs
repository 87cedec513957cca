pub mod types;
pub mod traits;
pub mod config;
pub mod openai;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, TokenUsage};

pub use config::OpenAIConfig;
pub use openai::OpenAIClient;
pub use types::{Message, Content, Tool, ToolCall, ToolChoice, FunctionCall, FunctionDefinition};
