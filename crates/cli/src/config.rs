use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use toolgate_tool_runtime::{ExchangeRateTable, PermissionLevel, PermissionPolicy};

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory the file-backed plugins read from
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum context window tokens
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,

    #[serde(default)]
    pub temperature: f32,

    /// Completion token limit per model call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Tool permission overrides (qualified name or glob -> "auto" | "confirm" | "deny")
    #[serde(default)]
    pub tool_permissions: HashMap<String, String>,

    /// Extra or replacement exchange rates keyed `FROM-TO`
    #[serde(default)]
    pub exchange_rates: HashMap<String, f64>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("Files")
}

fn default_max_context_tokens() -> usize {
    100_000
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_context_tokens: default_max_context_tokens(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            system_prompt: None,
            tool_permissions: HashMap::new(),
            exchange_rates: HashMap::new(),
        }
    }
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/toolgate/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("toolgate");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };
        Self::load_from(&config_path)
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            let config = Self::default();
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let toml_str = toml::to_string_pretty(&config)
                .context("failed to serialize default config")?;
            std::fs::write(config_path, toml_str).ok();
            Ok(config)
        }
    }

    /// Build the permission policy: built-in sensitive defaults plus the
    /// configured overrides. Unknown levels fall back to confirmation.
    pub fn permission_policy(&self) -> PermissionPolicy {
        let mut policy = PermissionPolicy::new();
        for (pattern, level_str) in &self.tool_permissions {
            let level = level_str.parse::<PermissionLevel>().unwrap_or_else(|_| {
                warn!(
                    tool = %pattern,
                    level = %level_str,
                    "Unknown permission level, defaulting to RequireConfirmation"
                );
                PermissionLevel::RequireConfirmation
            });
            policy.rules.insert(pattern.clone(), level);
        }
        policy
    }

    /// Default exchange rates with configured entries layered on top.
    pub fn exchange_rates(&self) -> ExchangeRateTable {
        let mut table = ExchangeRateTable::default();
        table.merge(&self.exchange_rates);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_tool_runtime::OperationId;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("Files"));
        assert_eq!(config.max_context_tokens, 100_000);
        assert!(config.tool_permissions.is_empty());
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(config.max_tokens, 4096);
        assert!(path.exists());

        let reloaded = CliConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.data_dir, config.data_dir);
    }

    #[test]
    fn test_parse_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/srv/lab"
temperature = 0.3

[tool_permissions]
"DevopsPlugin-DeployToStage" = "confirm"
"MusicLibraryPlugin-*" = "deny"

[exchange_rates]
"USD-EUR" = 0.9
"EUR-CHF" = 0.95
"#,
        )
        .unwrap();

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/lab"));
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);

        let policy = config.permission_policy();
        assert_eq!(
            policy.level_for(&OperationId::new("DevopsPlugin", "DeployToStage")),
            PermissionLevel::RequireConfirmation
        );
        assert_eq!(
            policy.level_for(&OperationId::new("MusicLibraryPlugin", "GetRecentPlays")),
            PermissionLevel::Deny
        );
        assert_eq!(
            policy.level_for(&OperationId::new("DevopsPlugin", "DeployToProd")),
            PermissionLevel::RequireConfirmation
        );

        let rates = config.exchange_rates();
        assert_eq!(rates.rate("USD", "EUR"), Some(0.9));
        assert_eq!(rates.rate("EUR", "CHF"), Some(0.95));
        assert_eq!(rates.rate("USD", "GBP"), Some(0.75));
    }

    #[test]
    fn test_unknown_level_requires_confirmation() {
        let mut config = CliConfig::default();
        config
            .tool_permissions
            .insert("DevopsPlugin-ReadLogFile".to_string(), "sometimes".to_string());
        let policy = config.permission_policy();
        assert_eq!(
            policy.level_for(&OperationId::new("DevopsPlugin", "ReadLogFile")),
            PermissionLevel::RequireConfirmation
        );
    }
}
