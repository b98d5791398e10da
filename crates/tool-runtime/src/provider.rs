use crate::conversation::ConversationMessage;
use crate::stream::StreamEvent;
use crate::tool::ToolDefinition;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Trait for chat models that support tool use.
///
/// Defined here, by the consumer (the agentic loop), rather than in
/// `crates/llm`. Implementations live in `crates/llm`.
#[async_trait]
pub trait ToolAwareLlmProvider: Send + Sync {
    /// Stream a response from the LLM with tool definitions available.
    async fn stream_with_tools(
        &self,
        messages: Vec<ConversationMessage>,
        system_prompt: Option<String>,
        tools: Vec<ToolDefinition>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<EventStream, LlmError>;

    /// Provider name for logging/debugging (e.g., "azure", "openai")
    fn provider_name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("Authentication failed")]
    AuthError,
}

/// Mock LLM provider for testing the agentic loop without real API calls.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use crate::stream::StopReason;
    use futures::stream;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A mock provider that replays pre-configured responses in order
    /// and records every transcript it was sent.
    pub struct MockLlmProvider {
        responses: Mutex<VecDeque<Vec<StreamEvent>>>,
        requests: Mutex<Vec<Vec<ConversationMessage>>>,
    }

    impl MockLlmProvider {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Queue a response that will be returned after the ones already queued.
        pub fn queue_response(&self, events: Vec<StreamEvent>) {
            self.responses.lock().unwrap().push_back(events);
        }

        /// Queue a simple text response.
        pub fn queue_text(&self, text: &str) {
            self.queue_response(vec![
                StreamEvent::TextDelta {
                    text: text.to_string(),
                },
                StreamEvent::MessageEnd {
                    stop_reason: StopReason::EndTurn,
                },
            ]);
        }

        /// Queue a response requesting the given tool calls `(id, name, json args)`.
        pub fn queue_tool_calls(&self, calls: &[(&str, &str, &str)]) {
            let mut events = Vec::new();
            for (id, name, args) in calls {
                events.push(StreamEvent::ToolCallStart {
                    id: id.to_string(),
                    name: name.to_string(),
                });
                events.push(StreamEvent::ToolCallDelta {
                    id: id.to_string(),
                    arguments_delta: args.to_string(),
                });
                events.push(StreamEvent::ToolCallEnd { id: id.to_string() });
            }
            events.push(StreamEvent::MessageEnd {
                stop_reason: StopReason::ToolUse,
            });
            self.queue_response(events);
        }

        /// Transcripts received so far, one per call.
        pub fn requests(&self) -> Vec<Vec<ConversationMessage>> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Default for MockLlmProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ToolAwareLlmProvider for MockLlmProvider {
        async fn stream_with_tools(
            &self,
            messages: Vec<ConversationMessage>,
            _system_prompt: Option<String>,
            _tools: Vec<ToolDefinition>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<EventStream, LlmError> {
            self.requests.lock().unwrap().push(messages);
            let events = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    vec![StreamEvent::MessageEnd {
                        stop_reason: StopReason::EndTurn,
                    }]
                });
            Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }
}
