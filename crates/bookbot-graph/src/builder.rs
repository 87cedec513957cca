use std::sync::Arc;

use bookbot_llm::ChatClient;
use bookbot_store::BookStore;

use crate::error::{AgentError, Result};
use crate::graph::Graph;
use crate::nodes::{CompletionClient, LLMNode, ToolNode};
use crate::prompts::system_prompt;
use crate::router::SimpleRouter;
use crate::tools::ToolRegistry;
use crate::types::{GraphConfig, LLMConfig};

/// Builder for constructing a Graph
pub struct GraphBuilder {
    chat_client: Option<Arc<dyn ChatClient>>,
    registry: Option<Arc<ToolRegistry>>,
    llm_config: Option<LLMConfig>,
    config: GraphConfig,
    system_prompt: Option<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            chat_client: None,
            registry: None,
            llm_config: None,
            config: GraphConfig::default(),
            system_prompt: None,
        }
    }

    pub fn chat_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.chat_client = Some(client);
        self
    }

    /// Answer questions from the catalog at this location
    pub fn store(mut self, store: BookStore) -> Self {
        self.registry = Some(Arc::new(ToolRegistry::new(store)));
        self
    }

    pub fn registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn llm_config(mut self, config: LLMConfig) -> Self {
        self.llm_config = Some(config);
        self
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn build(self) -> Result<Graph> {
        let chat_client = self
            .chat_client
            .ok_or_else(|| AgentError::Configuration("chat client is required".to_string()))?;
        let registry = self
            .registry
            .ok_or_else(|| AgentError::Configuration("book store is required".to_string()))?;
        let llm_config = self
            .llm_config
            .ok_or_else(|| AgentError::Configuration("model is required".to_string()))?;

        if llm_config.model.trim().is_empty() {
            return Err(AgentError::Configuration("model name is empty".to_string()));
        }

        let tools = registry.declarations();
        let llm_node = LLMNode::new(
            CompletionClient::new(chat_client, llm_config),
            self.system_prompt.unwrap_or_else(system_prompt),
            tools,
        );

        Ok(Graph::new(
            llm_node,
            ToolNode::new(registry),
            Box::new(SimpleRouter),
            self.config,
        ))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
