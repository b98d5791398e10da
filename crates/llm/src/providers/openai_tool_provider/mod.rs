//! OpenAI / Azure OpenAI implementation of [`ToolAwareLlmProvider`].
//!
//! Sends one non-streaming chat-completions request with the registered
//! tools attached and replays the reply as provider-agnostic
//! [`StreamEvent`]s.
//!
//! [`ToolAwareLlmProvider`]: toolgate_tool_runtime::provider::ToolAwareLlmProvider
//! [`StreamEvent`]: toolgate_tool_runtime::stream::StreamEvent

mod client;
mod translate;

pub use self::client::OpenAiToolProvider;

#[cfg(test)]
mod tests;
