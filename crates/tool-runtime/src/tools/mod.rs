//! Built-in plugins.
//!
//! - **DevopsPlugin**: deployments, branches, build log (`DeployToProd` is sensitive)
//! - **CurrencyConverterPlugin**: exchange rates from an injected table
//! - **MusicLibraryPlugin** / **MusicConcertsPlugin**: file-backed music data
//!
//! File-backed functions read from [`ToolContext::working_directory`].

pub mod currency;
pub mod devops;
pub mod music;

pub use currency::{CurrencyConverterPlugin, ExchangeRateTable};
pub use devops::{DevopsFunction, DevopsPlugin};
pub use music::{MusicConcertsPlugin, MusicLibraryPlugin};

use tracing::debug;

use crate::tool::{ToolContext, ToolError};

/// Read a data file relative to the context's working directory.
pub(crate) async fn read_data_file(context: &ToolContext, name: &str) -> Result<String, ToolError> {
    let path = context.working_directory.join(name);
    debug!(path = %path.display(), "reading data file");
    tokio::fs::read_to_string(&path).await.map_err(|e| {
        ToolError::ExecutionFailed(format!("failed to read '{}': {e}", path.display()))
    })
}
