use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::invocation::OperationId;

/// Permission level for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionLevel {
    /// Tool executes without asking the user
    AutoApprove,
    /// User must confirm before execution
    RequireConfirmation,
    /// Tool is blocked from executing
    Deny,
}

impl FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" | "auto_approve" => Ok(Self::AutoApprove),
            "confirm" | "require_confirmation" => Ok(Self::RequireConfirmation),
            "deny" => Ok(Self::Deny),
            other => Err(format!("unknown permission level '{}'", other)),
        }
    }
}

/// Operations that always require a human to approve them unless a
/// policy rule explicitly says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensitiveOperation {
    DeployToProd,
}

impl SensitiveOperation {
    pub const ALL: &'static [SensitiveOperation] = &[SensitiveOperation::DeployToProd];

    pub fn operation_id(self) -> OperationId {
        match self {
            Self::DeployToProd => OperationId::new("DevopsPlugin", "DeployToProd"),
        }
    }

    /// Resolve an identifier to its sensitive variant, if any.
    pub fn resolve(id: &OperationId) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| &s.operation_id() == id)
    }
}

/// Maps qualified operation names to permission levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionPolicy {
    /// Explicit per-tool permissions
    pub rules: HashMap<String, PermissionLevel>,
    /// Default permission for tools not in the rules map
    pub default: PermissionLevel,
}

impl PermissionPolicy {
    /// Everything passes through except the built-in sensitive set.
    pub fn new() -> Self {
        let rules = SensitiveOperation::ALL
            .iter()
            .map(|s| (s.operation_id().qualified_name(), PermissionLevel::RequireConfirmation))
            .collect();
        Self {
            rules,
            default: PermissionLevel::AutoApprove,
        }
    }

    /// Get the permission level for a given operation.
    /// Checks exact match first, then the longest matching glob pattern, then default.
    pub fn level_for(&self, id: &OperationId) -> PermissionLevel {
        let name = id.qualified_name();
        if let Some(&level) = self.rules.get(&name) {
            return level;
        }
        // Glob patterns (e.g., "DevopsPlugin-*")
        self.rules
            .iter()
            .filter_map(|(pattern, &level)| {
                let prefix = pattern.strip_suffix('*')?;
                name.starts_with(prefix).then_some((prefix.len(), level))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, level)| level)
            .unwrap_or(self.default)
    }
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> OperationId {
        OperationId::parse(name).unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = PermissionPolicy::new();
        assert_eq!(
            policy.level_for(&id("DevopsPlugin-DeployToProd")),
            PermissionLevel::RequireConfirmation
        );
        assert_eq!(
            policy.level_for(&id("DevopsPlugin-DeployToStage")),
            PermissionLevel::AutoApprove
        );
    }

    #[test]
    fn test_explicit_rule_overrides_sensitive_default() {
        let mut policy = PermissionPolicy::new();
        policy.rules.insert(
            "DevopsPlugin-DeployToProd".to_string(),
            PermissionLevel::AutoApprove,
        );
        assert_eq!(
            policy.level_for(&id("DevopsPlugin-DeployToProd")),
            PermissionLevel::AutoApprove
        );
    }

    #[test]
    fn test_glob_pattern() {
        let mut policy = PermissionPolicy::new();
        policy
            .rules
            .insert("MusicLibraryPlugin-*".to_string(), PermissionLevel::Deny);
        assert_eq!(
            policy.level_for(&id("MusicLibraryPlugin-AddToRecentlyPlayed")),
            PermissionLevel::Deny
        );
        assert_eq!(
            policy.level_for(&id("MusicConcertsPlugin-GetConcerts")),
            PermissionLevel::AutoApprove
        );
    }

    #[test]
    fn test_exact_rule_beats_glob() {
        let mut policy = PermissionPolicy::new();
        policy
            .rules
            .insert("DevopsPlugin-*".to_string(), PermissionLevel::AutoApprove);
        assert_eq!(
            policy.level_for(&id("DevopsPlugin-DeployToProd")),
            PermissionLevel::RequireConfirmation
        );
    }

    #[test]
    fn test_longest_glob_wins() {
        let mut policy = PermissionPolicy::new();
        policy
            .rules
            .insert("DevopsPlugin-*".to_string(), PermissionLevel::Deny);
        policy
            .rules
            .insert("DevopsPlugin-Create*".to_string(), PermissionLevel::RequireConfirmation);
        assert_eq!(
            policy.level_for(&id("DevopsPlugin-CreateNewBranch")),
            PermissionLevel::RequireConfirmation
        );
        assert_eq!(
            policy.level_for(&id("DevopsPlugin-ReadLogFile")),
            PermissionLevel::Deny
        );
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("auto".parse::<PermissionLevel>(), Ok(PermissionLevel::AutoApprove));
        assert_eq!("confirm".parse::<PermissionLevel>(), Ok(PermissionLevel::RequireConfirmation));
        assert_eq!("deny".parse::<PermissionLevel>(), Ok(PermissionLevel::Deny));
        assert!("maybe".parse::<PermissionLevel>().is_err());
    }

    #[test]
    fn test_sensitive_resolve() {
        assert_eq!(
            SensitiveOperation::resolve(&id("DevopsPlugin-DeployToProd")),
            Some(SensitiveOperation::DeployToProd)
        );
        assert_eq!(SensitiveOperation::resolve(&id("DevopsPlugin-DeployToStage")), None);
    }
}
