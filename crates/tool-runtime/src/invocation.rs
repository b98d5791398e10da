//! Invocation requests and results flowing through the interceptor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::tool::{ToolError, ToolResult};

/// Identifies an operation by `(namespace, operation)`.
///
/// On the wire the pair travels as `{namespace}-{operation}`; the namespace
/// therefore never contains a `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperationId {
    namespace: String,
    operation: String,
}

impl OperationId {
    pub fn new(namespace: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            operation: operation.into(),
        }
    }

    /// Parse a qualified `{namespace}-{operation}` name.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (namespace, operation) = qualified.split_once('-')?;
        if namespace.is_empty() || operation.is_empty() {
            return None;
        }
        Some(Self::new(namespace, operation))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn qualified_name(&self) -> String {
        format!("{}-{}", self.namespace, self.operation)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.namespace, self.operation)
    }
}

impl TryFrom<String> for OperationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid operation name '{}'", value))
    }
}

impl From<OperationId> for String {
    fn from(id: OperationId) -> Self {
        id.qualified_name()
    }
}

/// Argument name to value mapping for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Non-object values (including `null`) become an empty argument list.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn required_str(&self, name: &str) -> Result<&str, ToolError> {
        self.0
            .get(name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput(format!("missing '{}' field", name)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

/// A request to run one operation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    call_id: String,
    operation: OperationId,
    arguments: Arguments,
}

impl InvocationRequest {
    pub fn new(call_id: impl Into<String>, operation: OperationId, arguments: Arguments) -> Self {
        Self {
            call_id: call_id.into(),
            operation,
            arguments,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn operation(&self) -> &OperationId {
        &self.operation
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }
}

/// Outcome of an invocation: a produced value, or a denial with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationResult {
    Completed(String),
    Denied { reason: String },
}

impl InvocationResult {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Denied { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Denied { reason } => Some(reason),
        }
    }

    /// Denials go back to the model as ordinary content so the
    /// conversation can continue.
    pub fn into_tool_result(self, tool_call_id: String) -> ToolResult {
        let content = match self {
            Self::Completed(value) => value,
            Self::Denied { reason } => reason,
        };
        ToolResult {
            tool_call_id,
            content,
            is_error: false,
        }
    }
}
