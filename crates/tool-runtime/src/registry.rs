use crate::invocation::OperationId;
use crate::permission::{PermissionLevel, PermissionPolicy, SensitiveOperation};
use crate::tool::{Plugin, Tool, ToolDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A tool together with the permission level resolved when it was registered.
#[derive(Clone)]
pub struct RegisteredTool {
    tool: Arc<dyn Tool>,
    operation: OperationId,
    level: PermissionLevel,
}

impl RegisteredTool {
    pub fn tool(&self) -> &Arc<dyn Tool> {
        &self.tool
    }

    pub fn operation(&self) -> &OperationId {
        &self.operation
    }

    pub fn level(&self) -> PermissionLevel {
        self.level
    }
}

/// Manages available tools, their schemas, and lookup.
/// Thread-safe via Arc wrapping of individual tools.
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
    policy: PermissionPolicy,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::with_policy(PermissionPolicy::new())
    }

    pub fn with_policy(policy: PermissionPolicy) -> Self {
        Self {
            tools: HashMap::new(),
            policy,
        }
    }

    /// Register a tool. Returns error if name already registered.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        self.register_shared(Arc::new(tool))
    }

    /// Register every function of a plugin.
    pub fn register_plugin(&mut self, plugin: &dyn Plugin) -> Result<(), RegistryError> {
        for tool in plugin.functions() {
            let def = tool.definition();
            if def.operation.namespace() != plugin.name() {
                return Err(RegistryError::NamespaceMismatch {
                    plugin: plugin.name().to_string(),
                    operation: def.name(),
                });
            }
            self.register_shared(tool)?;
        }
        Ok(())
    }

    fn register_shared(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let def = tool.definition();
        let name = def.name();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        let level = self.policy.level_for(&def.operation);
        if let Some(sensitive) = SensitiveOperation::resolve(&def.operation) {
            if level != PermissionLevel::RequireConfirmation {
                warn!(
                    tool = %name,
                    ?sensitive,
                    ?level,
                    "Policy removes operator approval from a sensitive operation"
                );
            }
        }
        debug!(tool = %name, ?level, "Registered tool");
        self.tools.insert(
            name,
            RegisteredTool {
                tool,
                operation: def.operation,
                level,
            },
        );
        Ok(())
    }

    /// Look up a tool by its qualified name.
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// List all registered tool definitions (for sending to LLM), sorted by name.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|t| t.tool.definition()).collect();
        defs.sort_by_key(|d| d.name());
        defs
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool with name '{0}' is already registered")]
    DuplicateName(String),
    #[error("Plugin '{plugin}' cannot register '{operation}' outside its namespace")]
    NamespaceMismatch { plugin: String, operation: String },
}
