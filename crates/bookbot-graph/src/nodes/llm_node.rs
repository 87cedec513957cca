use crate::error::{AgentError, Result};
use crate::node::{Node, NodeType};
use crate::types::{LLMConfig, Thread, CANDIDATES, TEMPERATURE};
use async_trait::async_trait;
use bookbot_llm::{ChatClient, ChatOptions, ChatRequest, ChatResponse, Message, Tool, ToolCall, ToolChoice};
use std::sync::Arc;
use std::time::Instant;

/// What the model produced for one completion request
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    FinalAnswer(String),
    ToolRequests(Vec<ToolCall>),
}

impl From<ChatResponse> for CompletionResult {
    fn from(response: ChatResponse) -> Self {
        match response.tool_calls {
            Some(calls) if !calls.is_empty() => Self::ToolRequests(calls),
            _ => Self::FinalAnswer(response.content.unwrap_or_default()),
        }
    }
}

/// Sends the thread to the model with the system prompt and tool declarations
#[derive(Clone)]
pub struct CompletionClient {
    client: Arc<dyn ChatClient>,
    llm_config: LLMConfig,
}

impl CompletionClient {
    pub fn new(client: Arc<dyn ChatClient>, llm_config: LLMConfig) -> Self {
        Self { client, llm_config }
    }

    pub async fn complete(
        &self,
        thread: &[Message],
        system_prompt: &str,
        tools: &[Tool],
    ) -> Result<CompletionResult> {
        let mut messages = Vec::with_capacity(thread.len() + 1);
        messages.push(Message::system(system_prompt));
        messages.extend_from_slice(thread);

        let mut options = ChatOptions::new()
            .temperature(TEMPERATURE)
            .max_tokens(self.llm_config.max_tokens)
            .n(CANDIDATES);
        if !tools.is_empty() {
            options = options.tools(tools.to_vec()).tool_choice(ToolChoice::auto());
        }

        let request = ChatRequest::new(self.llm_config.model.clone(), messages).with_options(options);

        let start = Instant::now();
        let response = self
            .client
            .chat(request)
            .await
            .map_err(AgentError::Provider)?;

        let (input_tokens, output_tokens) = response
            .usage
            .as_ref()
            .map(|u| (u.input_tokens, u.output_tokens))
            .unwrap_or_default();
        tracing::info!(
            model = %self.llm_config.model,
            duration_ms = start.elapsed().as_millis() as u64,
            input_tokens,
            output_tokens,
            tool_calls = response.tool_calls.as_ref().map_or(0, Vec::len),
            "Completion received"
        );

        Ok(response.into())
    }
}

/// Asks the model for the next step and records its reply on the thread
pub struct LLMNode {
    completion: CompletionClient,
    system_prompt: String,
    tools: Vec<Tool>,
}

impl LLMNode {
    pub fn new(completion: CompletionClient, system_prompt: impl Into<String>, tools: Vec<Tool>) -> Self {
        Self {
            completion,
            system_prompt: system_prompt.into(),
            tools,
        }
    }
}

#[async_trait]
impl Node for LLMNode {
    async fn execute(&self, thread: &mut Thread) -> Result<()> {
        let result = self
            .completion
            .complete(thread.messages(), &self.system_prompt, &self.tools)
            .await?;

        match result {
            CompletionResult::FinalAnswer(text) => thread.add_message(Message::ai(text)),
            CompletionResult::ToolRequests(calls) => {
                tracing::debug!(count = calls.len(), "Model requested tools");
                thread.add_message(Message::ai_with_tools(calls));
            }
        }

        Ok(())
    }

    fn node_type(&self) -> NodeType {
        NodeType::Completion
    }
}
