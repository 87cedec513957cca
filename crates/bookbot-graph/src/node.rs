use crate::error::Result;
use crate::types::Thread;
use async_trait::async_trait;

/// One step of the question-answering loop
#[async_trait]
pub trait Node: Send + Sync {
    /// Run the step, appending whatever it produces to the thread
    async fn execute(&self, thread: &mut Thread) -> Result<()>;

    fn node_type(&self) -> NodeType;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Completion,
    Tool,
}
