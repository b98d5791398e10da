//! Music library and concert plugins backed by data files.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::read_data_file;
use crate::invocation::{Arguments, OperationId};
use crate::tool::{Plugin, Tool, ToolContext, ToolDefinition, ToolError};

pub const LIBRARY_NAMESPACE: &str = "MusicLibraryPlugin";
pub const CONCERTS_NAMESPACE: &str = "MusicConcertsPlugin";

const MUSIC_LIBRARY: &str = "MusicLibrary.txt";
const RECENTLY_PLAYED: &str = "RecentlyPlayed.txt";
const CONCERT_DATES: &str = "ConcertDates.txt";

pub struct MusicLibraryPlugin;

impl Plugin for MusicLibraryPlugin {
    fn name(&self) -> &'static str {
        LIBRARY_NAMESPACE
    }

    fn functions(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(GetMusicLibrary),
            Arc::new(GetRecentPlays),
            Arc::new(AddToRecentlyPlayed),
        ]
    }
}

pub struct MusicConcertsPlugin;

impl Plugin for MusicConcertsPlugin {
    fn name(&self) -> &'static str {
        CONCERTS_NAMESPACE
    }

    fn functions(&self) -> Vec<Arc<dyn Tool>> {
        vec![Arc::new(GetConcerts)]
    }
}

pub struct GetMusicLibrary;

#[async_trait]
impl Tool for GetMusicLibrary {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::without_parameters(
            OperationId::new(LIBRARY_NAMESPACE, "GetMusicLibrary"),
            "Get the songs available in the user's music library.",
        )
    }

    async fn execute(&self, _args: &Arguments, context: &ToolContext) -> Result<String, ToolError> {
        read_data_file(context, MUSIC_LIBRARY).await
    }
}

pub struct GetRecentPlays;

#[async_trait]
impl Tool for GetRecentPlays {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::without_parameters(
            OperationId::new(LIBRARY_NAMESPACE, "GetRecentPlays"),
            "Get the list of recently played songs.",
        )
    }

    async fn execute(&self, _args: &Arguments, context: &ToolContext) -> Result<String, ToolError> {
        read_data_file(context, RECENTLY_PLAYED).await
    }
}

/// Prepend a song to the recently played list.
pub struct AddToRecentlyPlayed;

#[async_trait]
impl Tool for AddToRecentlyPlayed {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            OperationId::new(LIBRARY_NAMESPACE, "AddToRecentlyPlayed"),
            "Add a song to the recently played list.",
            json!({
                "type": "object",
                "properties": {
                    "artist": { "type": "string", "description": "The song artist" },
                    "song": { "type": "string", "description": "The song title" },
                    "genre": { "type": "string", "description": "The song genre" }
                },
                "required": ["artist", "song", "genre"]
            }),
        )
    }

    async fn execute(&self, args: &Arguments, context: &ToolContext) -> Result<String, ToolError> {
        let artist = args.required_str("artist")?;
        let song = args.required_str("song")?;
        let genre = args.required_str("genre")?;

        let content = read_data_file(context, RECENTLY_PLAYED).await?;
        let mut played: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
            ToolError::ExecutionFailed(format!("{} is not a JSON array: {e}", RECENTLY_PLAYED))
        })?;

        played.insert(
            0,
            json!({
                "title": song,
                "artist": artist,
                "genre": genre,
            }),
        );

        let path = context.working_directory.join(RECENTLY_PLAYED);
        let updated = serde_json::to_string_pretty(&played)
            .map_err(|e| ToolError::Other(e.into()))?;
        tokio::fs::write(&path, updated).await.map_err(|e| {
            ToolError::ExecutionFailed(format!("failed to write '{}': {e}", path.display()))
        })?;
        debug!(path = %path.display(), count = played.len(), "updated recently played");

        Ok(format!("Added '{}' to recently played", song))
    }
}

pub struct GetConcerts;

#[async_trait]
impl Tool for GetConcerts {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::without_parameters(
            OperationId::new(CONCERTS_NAMESPACE, "GetConcerts"),
            "Get upcoming concert dates.",
        )
    }

    async fn execute(&self, _args: &Arguments, context: &ToolContext) -> Result<String, ToolError> {
        read_data_file(context, CONCERT_DATES).await
    }
}
