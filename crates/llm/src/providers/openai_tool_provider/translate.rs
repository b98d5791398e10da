//! Translation between provider-agnostic conversation types and the
//! chat-completions wire format.

use serde_json::{json, Value};

use toolgate_tool_runtime::{
    conversation::ConversationMessage,
    provider::LlmError,
    stream::{StopReason, StreamEvent},
    tool::ToolDefinition,
};

/// Translate a [`ToolDefinition`] into a `type: function` tool entry.
pub(super) fn tool_definition_to_openai(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name(),
            "description": tool.description,
            "parameters": tool.input_schema,
        }
    })
}

/// Translate a [`ConversationMessage`] into a chat-completions message.
pub(super) fn message_to_openai(msg: &ConversationMessage) -> Value {
    match msg {
        ConversationMessage::User(text) => json!({
            "role": "user",
            "content": text,
        }),
        ConversationMessage::Assistant(content) => {
            let mut message = json!({
                "role": "assistant",
                "content": content.text,
            });
            if !content.tool_calls.is_empty() {
                let calls: Vec<Value> = content
                    .tool_calls
                    .iter()
                    .map(|tc| {
                        json!({
                            "id": tc.id,
                            "type": "function",
                            "function": {
                                "name": tc.name,
                                "arguments": tc.input.to_string(),
                            }
                        })
                    })
                    .collect();
                message["tool_calls"] = json!(calls);
            }
            message
        }
        ConversationMessage::ToolResult(result) => json!({
            "role": "tool",
            "tool_call_id": result.tool_call_id,
            "content": result.content,
        }),
    }
}

/// Build the full message list, system prompt first.
pub(super) fn messages_to_openai(
    system_prompt: Option<&str>,
    messages: &[ConversationMessage],
) -> Vec<Value> {
    system_prompt
        .map(|system| json!({"role": "system", "content": system}))
        .into_iter()
        .chain(messages.iter().map(message_to_openai))
        .collect()
}

/// Replay a chat-completions response as a sequence of [`StreamEvent`]s.
pub(super) fn response_to_events(response: &Value) -> Result<Vec<StreamEvent>, LlmError> {
    let choice = response["choices"]
        .get(0)
        .ok_or_else(|| LlmError::InvalidResponse("missing choices[0]".into()))?;
    let message = &choice["message"];
    let mut events = Vec::new();

    if let Some(text) = message["content"].as_str().filter(|t| !t.is_empty()) {
        events.push(StreamEvent::TextDelta {
            text: text.to_string(),
        });
    }

    if let Some(calls) = message["tool_calls"].as_array() {
        for call in calls {
            let id = call["id"]
                .as_str()
                .ok_or_else(|| LlmError::InvalidResponse("tool call without id".into()))?
                .to_string();
            let name = call["function"]["name"]
                .as_str()
                .ok_or_else(|| LlmError::InvalidResponse("tool call without name".into()))?
                .to_string();
            let arguments = call["function"]["arguments"]
                .as_str()
                .unwrap_or_default()
                .to_string();

            events.push(StreamEvent::ToolCallStart {
                id: id.clone(),
                name,
            });
            events.push(StreamEvent::ToolCallDelta {
                id: id.clone(),
                arguments_delta: arguments,
            });
            events.push(StreamEvent::ToolCallEnd { id });
        }
    }

    let stop_reason = choice["finish_reason"]
        .as_str()
        .map(StopReason::from_finish_reason)
        .unwrap_or(StopReason::EndTurn);
    events.push(StreamEvent::MessageEnd { stop_reason });

    Ok(events)
}
