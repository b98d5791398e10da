use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed).filter(|s| !s.is_empty()) {
            return Some(v);
        }
    }
    lookup(key).filter(|s| !s.is_empty())
}

// ── Chat backend ──────────────────────────────────────────────

/// Which flavour of chat-completions endpoint to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatBackend {
    /// Azure OpenAI deployment (`api-key` header, deployment in the path)
    Azure,
    /// OpenAI or any OpenAI-compatible server (bearer token)
    OpenAi,
}

impl FromStr for ChatBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "azure" | "azure-openai" => Ok(Self::Azure),
            "openai" => Ok(Self::OpenAi),
            other => Err(ConfigError::Invalid {
                key: "LLM_PROVIDER",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ChatBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Azure => f.write_str("azure"),
            Self::OpenAi => f.write_str("openai"),
        }
    }
}

// ── LLM ───────────────────────────────────────────────────────

/// Credentials and endpoint for the hosted chat model.
#[derive(Clone)]
pub struct LlmConfig {
    pub backend: ChatBackend,
    pub api_key: String,
    /// Azure resource endpoint or OpenAI-compatible base URL
    pub base_url: String,
    /// Azure deployment name, or model id for OpenAI
    pub deployment: String,
    pub api_version: String,
}

impl LlmConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TOOLGATE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let profile = env::var("TOOLGATE_PROFILE")
            .unwrap_or_default()
            .to_uppercase();
        Self::from_lookup(&profile, |key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(profile: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match profiled(&lookup, profile, "LLM_PROVIDER") {
            Some(v) => v.parse()?,
            None => ChatBackend::Azure,
        };
        let api_key =
            profiled(&lookup, profile, "API_KEY").ok_or(ConfigError::Missing("API_KEY"))?;
        let deployment = profiled(&lookup, profile, "MODEL_DEPLOYMENT")
            .ok_or(ConfigError::Missing("MODEL_DEPLOYMENT"))?;
        let base_url = match (backend, profiled(&lookup, profile, "BASE_URL")) {
            (_, Some(url)) => url.trim_end_matches('/').to_string(),
            (ChatBackend::OpenAi, None) => "https://api.openai.com".to_string(),
            (ChatBackend::Azure, None) => return Err(ConfigError::Missing("BASE_URL")),
        };
        let api_version = profiled(&lookup, profile, "API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(Self {
            backend,
            api_key,
            base_url,
            deployment,
            api_version,
        })
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!(
            backend = %self.backend,
            base_url = %self.base_url,
            deployment = %self.deployment,
            "LLM config loaded"
        );
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("backend", &self.backend)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}
