use crate::approval::ApprovalPrompt;
use crate::conversation::{AssistantContent, Conversation};
use crate::interceptor::InvocationInterceptor;
use crate::invocation::{Arguments, InvocationRequest, InvocationResult};
use crate::provider::{LlmError, ToolAwareLlmProvider};
use crate::registry::ToolRegistry;
use crate::stream::StreamEvent;
use crate::tool::{ToolCall, ToolContext, ToolResult};
use futures::StreamExt;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The core agentic loop that orchestrates LLM ↔ Tool execution.
///
/// Flow: User → LLM → ToolCalls → Interceptor → Results → LLM → ... → Final Text
///
/// Tool calls requested in one turn run strictly one after another: an
/// approval prompt blocks the whole conversation until it is answered.
pub struct AgenticLoop {
    provider: Arc<dyn ToolAwareLlmProvider>,
    registry: Arc<ToolRegistry>,
    interceptor: InvocationInterceptor,
    max_iterations: usize,
    temperature: f32,
    max_tokens: u32,
}

impl AgenticLoop {
    pub fn new(
        provider: Arc<dyn ToolAwareLlmProvider>,
        registry: Arc<ToolRegistry>,
        prompt: Arc<dyn ApprovalPrompt>,
    ) -> Self {
        Self {
            provider,
            registry,
            interceptor: InvocationInterceptor::new(prompt),
            max_iterations: 10,
            temperature: 0.0,
            max_tokens: 4096,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Run a single user turn through the agentic loop.
    /// Returns all stream events; the conversation holds the transcript.
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        user_message: String,
        tool_context: &ToolContext,
    ) -> Result<Vec<StreamEvent>, AgenticLoopError> {
        conversation.add_user_message(user_message);
        let mut all_events = Vec::new();

        for iteration in 0..self.max_iterations {
            debug!(
                iteration,
                provider = self.provider.provider_name(),
                "Starting agentic loop iteration"
            );

            let tools = self.registry.list();

            let mut stream = self
                .provider
                .stream_with_tools(
                    conversation.messages().to_vec(),
                    conversation.system_prompt().map(String::from),
                    tools,
                    self.temperature,
                    self.max_tokens,
                )
                .await?;

            let mut text_parts = Vec::new();
            let mut tool_calls: Vec<ToolCall> = Vec::new();
            let mut current_tool_args = String::new();
            let mut current_tool_id = String::new();
            let mut current_tool_name = String::new();

            while let Some(event_result) = stream.next().await {
                let event = event_result?;
                match &event {
                    StreamEvent::TextDelta { text } => {
                        text_parts.push(text.clone());
                    }
                    StreamEvent::ToolCallStart { id, name } => {
                        current_tool_id = id.clone();
                        current_tool_name = name.clone();
                        current_tool_args.clear();
                    }
                    StreamEvent::ToolCallDelta { arguments_delta, .. } => {
                        current_tool_args.push_str(arguments_delta);
                    }
                    StreamEvent::ToolCallEnd { .. } => {
                        let input = parse_arguments(&current_tool_name, &current_tool_args);
                        tool_calls.push(ToolCall {
                            id: current_tool_id.clone(),
                            name: current_tool_name.clone(),
                            input,
                        });
                    }
                    StreamEvent::MessageEnd { stop_reason } => {
                        debug!(?stop_reason, "Model turn finished");
                    }
                    StreamEvent::Error { message } => {
                        warn!(error = %message, "Stream error");
                    }
                }
                all_events.push(event);
            }

            let text = if text_parts.is_empty() {
                None
            } else {
                Some(text_parts.join(""))
            };
            conversation.add_assistant_response(AssistantContent {
                text,
                tool_calls: tool_calls.clone(),
            });

            if tool_calls.is_empty() {
                info!(iteration, "Agentic loop complete (no tool calls)");
                return Ok(all_events);
            }

            info!(count = tool_calls.len(), "Executing tool calls");
            for call in &tool_calls {
                let result = self.execute_tool_call(call, tool_context).await;
                conversation.add_tool_result(result);
            }
        }

        Err(AgenticLoopError::MaxIterations(self.max_iterations))
    }

    /// Resolve one call and run it through the interceptor.
    async fn execute_tool_call(&self, call: &ToolCall, context: &ToolContext) -> ToolResult {
        let Some(entry) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "Unknown tool requested");
            return ToolResult {
                tool_call_id: call.id.clone(),
                content: format!("Unknown tool: {}", call.name),
                is_error: true,
            };
        };

        let request = InvocationRequest::new(
            call.id.clone(),
            entry.operation().clone(),
            Arguments::from_value(call.input.clone()),
        );
        let tool = entry.tool();
        let args = request.arguments();

        let outcome = self
            .interceptor
            .intercept(&request, entry.level(), move || async move {
                tool.execute(args, context)
                    .await
                    .map(InvocationResult::Completed)
            })
            .await;

        match outcome {
            Ok(result) => result.into_tool_result(call.id.clone()),
            Err(e) => ToolResult {
                tool_call_id: call.id.clone(),
                content: format!("Tool error: {}", e),
                is_error: true,
            },
        }
    }
}

/// Decode streamed argument JSON. Anything that is not a JSON object,
/// including an empty string, becomes `{}`.
fn parse_arguments(tool: &str, raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            warn!(tool, arguments = %other, "Tool arguments are not an object");
            Value::Object(Map::new())
        }
        Err(e) => {
            warn!(tool, error = %e, "Malformed tool arguments");
            Value::Object(Map::new())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgenticLoopError {
    #[error("LLM error: {0}")]
    LlmError(#[from] LlmError),
    #[error("Max iterations ({0}) exceeded")]
    MaxIterations(usize),
}
