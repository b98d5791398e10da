pub mod openai_tool_provider;

use std::sync::Arc;

use toolgate_core::LlmConfig;
use toolgate_tool_runtime::provider::ToolAwareLlmProvider;

/// Create the tool-aware provider described by `config`.
pub fn create_tool_provider(config: &LlmConfig) -> Arc<dyn ToolAwareLlmProvider> {
    Arc::new(openai_tool_provider::OpenAiToolProvider::new(config.clone()))
}
