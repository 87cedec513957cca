use crate::error::{AgentError, Result};
use crate::node::{Node, NodeType};
use crate::nodes::{LLMNode, ToolNode};
use crate::router::{NextNode, Router};
use crate::types::{GraphConfig, Thread};
use bookbot_llm::Message;
use std::time::Instant;
use tracing::Instrument;

/// Result of answering one question
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub answer: String,
    /// Full thread: question, tool requests and results, final answer
    pub thread: Vec<Message>,
    pub completions: usize,
    pub tool_rounds: usize,
}

/// Completion/tool loop for a single question
pub struct Graph {
    llm_node: LLMNode,
    tool_node: ToolNode,
    router: Box<dyn Router>,
    config: GraphConfig,
}

impl Graph {
    pub(crate) fn new(
        llm_node: LLMNode,
        tool_node: ToolNode,
        router: Box<dyn Router>,
        config: GraphConfig,
    ) -> Self {
        Self {
            llm_node,
            tool_node,
            router,
            config,
        }
    }

    pub fn builder() -> crate::builder::GraphBuilder {
        crate::builder::GraphBuilder::new()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Answer a question, returning only the final text
    pub async fn process_user_question(&self, question: &str) -> Result<String> {
        match self.run(question).await {
            Ok(outcome) => Ok(outcome.answer),
            Err(e) => {
                tracing::error!(error = %e, "Failed to answer question");
                Err(e)
            }
        }
    }

    /// Answer a question, keeping the thread for inspection
    pub async fn run(&self, question: &str) -> Result<TurnOutcome> {
        let thread = Thread::new(question);
        let span = tracing::info_span!("turn", run_id = %thread.run_id);
        self.execute_loop(thread).instrument(span).await
    }

    async fn execute_loop(&self, mut thread: Thread) -> Result<TurnOutcome> {
        let start_time = Instant::now();
        let mut current_node = NodeType::Completion;
        let mut completions = 0;
        let mut tool_rounds = 0;

        loop {
            let node: &dyn Node = match current_node {
                NodeType::Completion => &self.llm_node,
                NodeType::Tool => {
                    // Guardrail: the model keeps asking for tools
                    if tool_rounds >= self.config.max_tool_rounds {
                        tracing::warn!(tool_rounds, "Tool round limit reached");
                        return Err(AgentError::TurnLimitExceeded(tool_rounds));
                    }
                    &self.tool_node
                }
            };

            let node_start = Instant::now();
            node.execute(&mut thread).await?;
            tracing::debug!(
                node = ?node.node_type(),
                duration_ms = node_start.elapsed().as_millis() as u64,
                messages = thread.len(),
                "Node executed"
            );

            match node.node_type() {
                NodeType::Completion => completions += 1,
                NodeType::Tool => tool_rounds += 1,
            }

            match self.router.next(&thread, current_node) {
                NextNode::End => break,
                NextNode::Completion => current_node = NodeType::Completion,
                NextNode::Tool => current_node = NodeType::Tool,
            }
        }

        let answer = thread.final_answer().unwrap_or_default();
        tracing::info!(
            completions,
            tool_rounds,
            total_duration_ms = start_time.elapsed().as_millis() as u64,
            "Question answered"
        );

        Ok(TurnOutcome {
            answer,
            thread: thread.into_messages(),
            completions,
            tool_rounds,
        })
    }
}
