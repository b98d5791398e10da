use clap::Parser;

/// Chat assistant whose sensitive tool calls wait for operator approval.
///
/// Provides a terminal REPL that talks to a hosted chat model and runs
/// the built-in plugins through the invocation interceptor.
#[derive(Parser, Debug)]
#[command(name = "toolgate", about = "Chat assistant with human-approved tool calls")]
pub struct CliArgs {
    /// Chat backend override: azure or openai
    #[arg(long)]
    pub provider: Option<String>,

    /// Deployment (Azure) or model id (OpenAI) override
    #[arg(long)]
    pub model: Option<String>,

    /// Path to config file (default: ~/.config/toolgate/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Directory holding build.log and the music data files
    #[arg(long)]
    pub data_dir: Option<String>,

    /// System prompt override
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Maximum agentic loop iterations per turn
    #[arg(long, default_value = "10")]
    pub max_iterations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["toolgate"]);
        assert_eq!(args.max_iterations, 10);
        assert!(args.provider.is_none());
        assert!(args.data_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::parse_from([
            "toolgate",
            "--provider",
            "openai",
            "--model",
            "gpt-4o-mini",
            "--data-dir",
            "/srv/lab",
            "--max-iterations",
            "3",
        ]);
        assert_eq!(args.provider.as_deref(), Some("openai"));
        assert_eq!(args.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(args.data_dir.as_deref(), Some("/srv/lab"));
        assert_eq!(args.max_iterations, 3);
    }
}
