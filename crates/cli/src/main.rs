mod cli;
mod config;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use toolgate_core::config::load_dotenv;
use toolgate_core::{ChatBackend, LlmConfig};
use toolgate_llm::create_tool_provider;
use toolgate_tool_runtime::{
    AgenticLoop, ApprovalPrompt, Conversation, CurrencyConverterPlugin, DevopsPlugin,
    MusicConcertsPlugin, MusicLibraryPlugin, ToolContext, ToolRegistry,
};

use crate::cli::CliArgs;
use crate::config::CliConfig;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    load_dotenv();

    let config = CliConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;

    let mut llm = LlmConfig::from_env().context("failed to load LLM settings")?;
    if let Some(ref provider) = args.provider {
        llm.backend = provider
            .parse::<ChatBackend>()
            .with_context(|| format!("invalid --provider '{}'", provider))?;
    }
    if let Some(ref model) = args.model {
        llm.deployment = model.clone();
    }
    llm.log_summary();

    let provider = create_tool_provider(&llm);

    let mut registry = ToolRegistry::with_policy(config.permission_policy());
    registry
        .register_plugin(&DevopsPlugin)
        .context("failed to register DevopsPlugin")?;
    registry
        .register_plugin(&CurrencyConverterPlugin::new(config.exchange_rates()))
        .context("failed to register CurrencyConverterPlugin")?;
    registry
        .register_plugin(&MusicLibraryPlugin)
        .context("failed to register MusicLibraryPlugin")?;
    registry
        .register_plugin(&MusicConcertsPlugin)
        .context("failed to register MusicConcertsPlugin")?;
    info!(tools = registry.len(), "Tool registry ready");

    let terminal = Arc::new(Terminal::new());
    let prompt: Arc<dyn ApprovalPrompt> = terminal.clone();

    let agentic_loop = AgenticLoop::new(provider, Arc::new(registry), prompt)
        .with_max_iterations(args.max_iterations)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    let mut conversation = Conversation::new(config.max_context_tokens);
    if let Some(prompt) = args.system_prompt.clone().or(config.system_prompt.clone()) {
        conversation = conversation.with_system_prompt(prompt);
    }

    let data_dir = args
        .data_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let tool_context = ToolContext {
        working_directory: data_dir,
    };

    terminal.print_banner()?;

    // REPL loop
    while let Some(input) = terminal.read_input()? {
        match agentic_loop
            .run(&mut conversation, input, &tool_context)
            .await
        {
            Ok(_) => {
                let reply = conversation.last_assistant_text().unwrap_or_default();
                terminal.print_reply(reply)?;
            }
            Err(e) => {
                error!(error = %e, "Agentic loop error");
                terminal.print_error(&format!("{:#}", e))?;
            }
        }
    }

    Ok(())
}
