//! Discord client setup and lifecycle management.
//!
//! This module provides the PanopticonBot struct which owns the Serenity client
//! and wires the archive handler into it.

use super::{DiscordError, DiscordErrorKind, EventRecorder, RecipientCache};
use super::handler::PanopticonHandler;
use serenity::Client;
use serenity::cache::Settings as CacheSettings;
use serenity::gateway::ShardManager;
use std::sync::Arc;
use tracing::{info, instrument};

/// Gateway client for the archive.
///
/// # Example
/// ```no_run
/// use panopticon_social::{EventRecorder, InMemoryArchive, PanopticonBot, RecipientCache, SessionState};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let recorder = EventRecorder::new(
///         Arc::new(InMemoryArchive::new()),
///         Arc::new(SessionState::new()),
///     );
///
///     let mut bot = PanopticonBot::new(
///         &token,
///         1000,
///         Arc::new(recorder),
///         Arc::new(RecipientCache::new(512)),
///     )
///     .await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct PanopticonBot {
    client: Client,
}

impl PanopticonBot {
    /// Build the Serenity client.
    ///
    /// `max_messages` bounds serenity's per-channel message cache, which is
    /// where pre-edit message content comes from.
    ///
    /// # Errors
    /// Returns an error if the token is blank or the Serenity client fails to
    /// initialize.
    #[instrument(skip(token, recorder, recipients), fields(token_len = token.len()))]
    pub async fn new(
        token: &str,
        max_messages: usize,
        recorder: Arc<EventRecorder>,
        recipients: Arc<RecipientCache>,
    ) -> Result<Self, DiscordError> {
        if token.trim().is_empty() {
            return Err(DiscordError::new(DiscordErrorKind::ConfigurationError(
                "Discord token is empty".to_string(),
            )));
        }

        info!("Initializing Panopticon Discord client");

        let handler = PanopticonHandler::new(recorder, recipients);
        let intents = PanopticonHandler::intents();

        let mut cache_settings = CacheSettings::default();
        cache_settings.max_messages = max_messages;

        info!(?intents, max_messages, "Building Serenity client");

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .cache_settings(cache_settings)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }

    /// Connect to the gateway and process events until the shards stop.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or encounters a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), DiscordError> {
        info!("Starting Discord gateway session");

        self.client.start().await.map_err(|e| {
            DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })?;

        Ok(())
    }

    /// Handle for shutting the gateway down from another task.
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        Arc::clone(&self.client.shard_manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::{InMemoryArchive, SessionState};

    #[tokio::test]
    async fn test_blank_token_rejected_before_connecting() {
        let recorder = Arc::new(EventRecorder::new(
            Arc::new(InMemoryArchive::new()),
            Arc::new(SessionState::new()),
        ));

        let result = PanopticonBot::new("   ", 10, recorder, Arc::new(RecipientCache::new(0))).await;
        let err = match result {
            Ok(_) => panic!("blank token accepted"),
            Err(e) => e,
        };
        assert!(matches!(err.kind(), DiscordErrorKind::ConfigurationError(_)));
    }
}
