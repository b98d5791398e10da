use serde::{Deserialize, Serialize};

/// Events emitted while a model response is produced.
/// Provider-agnostic; the provider layer translates chat-completion
/// payloads into this sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StreamEvent {
    /// A chunk of text from the assistant
    TextDelta { text: String },
    /// The model requests a tool call
    ToolCallStart { id: String, name: String },
    /// Incremental JSON argument data for a tool call
    ToolCallDelta { id: String, arguments_delta: String },
    /// Tool call arguments are complete
    ToolCallEnd { id: String },
    /// The entire message is complete
    MessageEnd { stop_reason: StopReason },
    /// The provider reported a non-fatal problem
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Normal end of response
    EndTurn,
    /// Model wants to use tools
    ToolUse,
    /// Hit max tokens limit
    MaxTokens,
    /// Output withheld by the provider's content filter
    ContentFilter,
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "tool_calls" | "function_call" => Self::ToolUse,
            "length" => Self::MaxTokens,
            "content_filter" => Self::ContentFilter,
            _ => Self::EndTurn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(StopReason::from_finish_reason("tool_calls"), StopReason::ToolUse);
        assert_eq!(StopReason::from_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_finish_reason("content_filter"),
            StopReason::ContentFilter
        );
    }
}
