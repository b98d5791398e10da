pub mod approval;
pub mod conversation;
pub mod interceptor;
pub mod invocation;
pub mod permission;
pub mod provider;
pub mod registry;
pub mod runtime;
pub mod stream;
pub mod tool;
pub mod tools;

pub use approval::{ApprovalDecision, ApprovalPrompt, LineApprovalPrompt, DENIAL_REASON};
pub use conversation::Conversation;
pub use interceptor::InvocationInterceptor;
pub use invocation::{Arguments, InvocationRequest, InvocationResult, OperationId};
pub use permission::{PermissionLevel, PermissionPolicy, SensitiveOperation};
pub use provider::{LlmError, ToolAwareLlmProvider};
pub use registry::{RegisteredTool, RegistryError, ToolRegistry};
pub use runtime::{AgenticLoop, AgenticLoopError};
pub use stream::{StopReason, StreamEvent};
pub use tool::{Plugin, Tool, ToolCall, ToolContext, ToolDefinition, ToolError, ToolResult};
pub use tools::{
    CurrencyConverterPlugin, DevopsPlugin, ExchangeRateTable, MusicConcertsPlugin,
    MusicLibraryPlugin,
};
