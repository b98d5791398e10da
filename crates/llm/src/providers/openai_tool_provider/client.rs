//! [`ToolAwareLlmProvider`] implementation over the chat-completions API.

use async_trait::async_trait;
use futures::stream;
use serde_json::{json, Value};
use tracing::debug;

use toolgate_core::{ChatBackend, LlmConfig};
use toolgate_tool_runtime::{
    conversation::ConversationMessage,
    provider::{EventStream, LlmError, ToolAwareLlmProvider},
    tool::ToolDefinition,
};

use super::translate::{messages_to_openai, response_to_events, tool_definition_to_openai};

/// Chat-completions provider with function calling, for Azure OpenAI
/// deployments and OpenAI-compatible servers.
pub struct OpenAiToolProvider {
    client: reqwest::Client,
    config: LlmConfig,
    name: String,
}

impl OpenAiToolProvider {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            name: config.backend.to_string(),
            config,
        }
    }

    pub(super) fn endpoint_url(&self) -> String {
        match self.config.backend {
            ChatBackend::Azure => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.config.base_url, self.config.deployment, self.config.api_version
            ),
            ChatBackend::OpenAi => format!("{}/v1/chat/completions", self.config.base_url),
        }
    }

    pub(super) fn request_body(
        &self,
        messages: &[ConversationMessage],
        system_prompt: Option<&str>,
        tools: &[ToolDefinition],
        temperature: f32,
        max_tokens: u32,
    ) -> Value {
        let mut body = json!({
            "messages": messages_to_openai(system_prompt, messages),
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        // Azure addresses the model through the deployment in the URL
        if self.config.backend == ChatBackend::OpenAi {
            body["model"] = json!(self.config.deployment);
        }

        if !tools.is_empty() {
            let api_tools: Vec<Value> = tools.iter().map(tool_definition_to_openai).collect();
            body["tools"] = json!(api_tools);
            body["tool_choice"] = json!("auto");
        }

        body
    }
}

#[async_trait]
impl ToolAwareLlmProvider for OpenAiToolProvider {
    async fn stream_with_tools(
        &self,
        messages: Vec<ConversationMessage>,
        system_prompt: Option<String>,
        tools: Vec<ToolDefinition>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<EventStream, LlmError> {
        let url = self.endpoint_url();
        let body = self.request_body(
            &messages,
            system_prompt.as_deref(),
            &tools,
            temperature,
            max_tokens,
        );

        debug!(
            backend = %self.config.backend,
            deployment = %self.config.deployment,
            tools = tools.len(),
            "sending chat completion request"
        );

        let request = self.client.post(&url).json(&body);
        let request = match self.config.backend {
            ChatBackend::Azure => request.header("api-key", &self.config.api_key),
            ChatBackend::OpenAi => request.bearer_auth(&self.config.api_key),
        };

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            if status == 401 {
                return Err(LlmError::AuthError);
            }
            if status == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30);
                return Err(LlmError::RateLimited {
                    retry_after_secs: retry_after,
                });
            }
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let events = response_to_events(&payload)?;

        Ok(Box::pin(stream::iter(events.into_iter().map(Ok))))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
