use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::invocation::{Arguments, OperationId};

/// Describes a tool's interface for LLM consumption.
/// Maps to OpenAI's function format; `name` is the qualified
/// `{namespace}-{operation}` wire name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "name")]
    pub operation: OperationId,
    /// Human-readable description for the LLM
    pub description: String,
    /// JSON Schema describing the expected input
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(operation: OperationId, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            operation,
            description: description.into(),
            input_schema,
        }
    }

    /// Definition for an operation that takes no arguments.
    pub fn without_parameters(operation: OperationId, description: impl Into<String>) -> Self {
        Self::new(
            operation,
            description,
            serde_json::json!({ "type": "object", "properties": {} }),
        )
    }

    /// Qualified wire name sent to the model.
    pub fn name(&self) -> String {
        self.operation.qualified_name()
    }
}

/// Represents an LLM requesting execution of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique ID for this invocation (used to match results)
    pub id: String,
    /// Qualified tool name to execute
    pub name: String,
    /// JSON input arguments
    pub input: Value,
}

/// Result of executing a tool, sent back to the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Must match the ToolCall id
    pub tool_call_id: String,
    /// Result content (text or structured)
    pub content: String,
    /// Whether this result represents an error
    pub is_error: bool,
}

/// Context passed to tool execution.
pub struct ToolContext {
    /// Directory holding the data files plugins read and write
    pub working_directory: std::path::PathBuf,
}

/// The primary extension point: every plugin function implements this trait.
///
/// Tools are object-safe, Send + Sync, and async.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (identifier, description, JSON Schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: &Arguments, context: &ToolContext) -> Result<String, ToolError>;
}

/// A named group of tools sharing one namespace.
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn functions(&self) -> Vec<Arc<dyn Tool>>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Approval prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl fmt::Display for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.description)
    }
}

/// Simple echo tool for testing purposes.
#[cfg(test)]
pub struct EchoTool;

#[cfg(test)]
#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            OperationId::new("TestPlugin", "Echo"),
            "Echoes back the input message. For testing.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "The message to echo back"
                    }
                },
                "required": ["message"]
            }),
        )
    }

    async fn execute(&self, args: &Arguments, _context: &ToolContext) -> Result<String, ToolError> {
        Ok(args.required_str("message")?.to_string())
    }
}
