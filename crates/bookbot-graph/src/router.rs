use crate::node::NodeType;
use crate::types::Thread;

/// Decides which node runs next based on the thread
pub trait Router: Send + Sync {
    fn next(&self, thread: &Thread, current: NodeType) -> NextNode;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextNode {
    Completion,
    Tool,
    End,
}

/// Completion -> Tool (while tool calls are pending) -> Completion -> End
pub struct SimpleRouter;

impl Router for SimpleRouter {
    fn next(&self, thread: &Thread, current: NodeType) -> NextNode {
        match current {
            NodeType::Completion => {
                if thread.has_pending_tool_calls() {
                    NextNode::Tool
                } else {
                    NextNode::End
                }
            }
            NodeType::Tool => NextNode::Completion,
        }
    }
}
