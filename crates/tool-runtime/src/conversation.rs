use crate::tool::{ToolCall, ToolResult};
use serde::{Deserialize, Serialize};

/// A message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConversationMessage {
    /// User's text input
    User(String),
    /// Assistant's response (may contain text and/or tool calls)
    Assistant(AssistantContent),
    /// Result of a tool execution
    ToolResult(ToolResult),
}

/// Content from the assistant that can contain mixed text and tool calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantContent {
    /// Text blocks in the response
    pub text: Option<String>,
    /// Tool calls requested by the assistant
    pub tool_calls: Vec<ToolCall>,
}

/// Manages conversation history with context window awareness.
pub struct Conversation {
    messages: Vec<ConversationMessage>,
    /// Maximum approximate token count before truncation
    max_tokens: usize,
    /// System prompt (always retained)
    system_prompt: Option<String>,
}

impl Conversation {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_tokens,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn add_user_message(&mut self, text: String) {
        self.messages.push(ConversationMessage::User(text));
        self.maybe_truncate();
    }

    pub fn add_assistant_response(&mut self, content: AssistantContent) {
        self.messages.push(ConversationMessage::Assistant(content));
        self.maybe_truncate();
    }

    pub fn add_tool_result(&mut self, result: ToolResult) {
        self.messages.push(ConversationMessage::ToolResult(result));
        self.maybe_truncate();
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Latest assistant text given since the most recent user message.
    pub fn last_assistant_text(&self) -> Option<&str> {
        for message in self.messages.iter().rev() {
            match message {
                ConversationMessage::User(_) => return None,
                ConversationMessage::Assistant(AssistantContent { text: Some(text), .. }) => {
                    return Some(text)
                }
                _ => {}
            }
        }
        None
    }

    /// Approximate token count using character count / 4 heuristic.
    pub fn approximate_tokens(&self) -> usize {
        let char_count: usize = self
            .messages
            .iter()
            .map(|m| match m {
                ConversationMessage::User(text) => text.len(),
                ConversationMessage::Assistant(content) => {
                    content.text.as_ref().map_or(0, |t| t.len())
                        + content
                            .tool_calls
                            .iter()
                            .map(|tc| tc.input.to_string().len())
                            .sum::<usize>()
                }
                ConversationMessage::ToolResult(result) => result.content.len(),
            })
            .sum();
        char_count / 4
    }

    /// Drop the oldest whole turns (keeping system prompt) when over token limit.
    ///
    /// A turn is a user message plus every assistant message and tool result
    /// that follows it, so tool results never outlive their tool calls. The
    /// current turn is always kept.
    fn maybe_truncate(&mut self) {
        while self.approximate_tokens() > self.max_tokens {
            let next_turn = self
                .messages
                .iter()
                .skip(1)
                .position(|m| matches!(m, ConversationMessage::User(_)));
            match next_turn {
                Some(offset) => {
                    self.messages.drain(..=offset);
                }
                None => break,
            }
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(100_000) // 100k tokens default
    }
}
