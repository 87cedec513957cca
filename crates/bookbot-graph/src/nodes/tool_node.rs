use crate::error::Result;
use crate::node::{Node, NodeType};
use crate::tools::ToolRegistry;
use crate::types::Thread;
use async_trait::async_trait;
use std::sync::Arc;

/// Runs every pending tool call, in order, and appends one result per call
pub struct ToolNode {
    registry: Arc<ToolRegistry>,
}

impl ToolNode {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Node for ToolNode {
    async fn execute(&self, thread: &mut Thread) -> Result<()> {
        for call in thread.pending_tool_calls() {
            let result = self.registry.dispatch_call(&call).await?;
            thread.add_tool_result(call.id, call.function.name, result);
        }

        Ok(())
    }

    fn node_type(&self) -> NodeType {
        NodeType::Tool
    }
}
