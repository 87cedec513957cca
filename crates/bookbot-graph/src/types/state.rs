use bookbot_llm::{Content, Message, ToolCall};

/// Conversation thread for a single user question
///
/// Append-only. Created when a question arrives and dropped once the answer
/// is returned; nothing carries over between questions.
#[derive(Debug, Clone)]
pub struct Thread {
    pub run_id: String,
    messages: Vec<Message>,
}

impl Thread {
    pub fn new(question: impl Into<Content>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            messages: vec![Message::human(question)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn has_pending_tool_calls(&self) -> bool {
        self.last_message()
            .is_some_and(|msg| !msg.tool_calls().is_empty())
    }

    /// Tool calls of the last message, if it is an assistant tool request
    pub fn pending_tool_calls(&self) -> Vec<ToolCall> {
        self.last_message()
            .map(|msg| msg.tool_calls().to_vec())
            .unwrap_or_default()
    }

    pub fn add_tool_result(
        &mut self,
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        result: impl Into<String>,
    ) {
        self.messages
            .push(Message::tool_result(tool_call_id, name, result.into()));
    }

    /// Text of the closing assistant message, once the model has answered
    pub fn final_answer(&self) -> Option<String> {
        match self.last_message()? {
            msg @ Message::AI { .. } if msg.tool_calls().is_empty() => {
                Some(msg.text().unwrap_or_default())
            }
            _ => None,
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
