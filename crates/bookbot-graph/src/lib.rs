//! Question-answering loop over the book catalog.
//!
//! A [`Graph`] alternates between asking the model for the next step and
//! running the SQL tool it requests, until the model returns a final answer.

pub mod builder;
pub mod error;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod prompts;
pub mod router;
pub mod tools;
pub mod types;

pub use builder::GraphBuilder;
pub use error::{AgentError, Result};
pub use graph::{Graph, TurnOutcome};
pub use node::{Node, NodeType};
pub use nodes::{CompletionClient, CompletionResult};
pub use router::{NextNode, Router, SimpleRouter};
pub use tools::{BookTool, ToolExecutionError, ToolRegistry};
pub use types::{GraphConfig, LLMConfig, Thread};
