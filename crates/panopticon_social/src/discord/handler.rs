//! Serenity event handler for the archive.
//!
//! Converts gateway payloads into snapshots, resolves channel topology through
//! the serenity cache (falling back to HTTP), and hands the result to the
//! [`EventRecorder`]. Failures are logged; the session keeps running.

use async_trait::async_trait;
use serenity::all::{
    Channel, ChannelId, ChannelType, Context, EventHandler, GatewayIntents, GuildId, Message,
    MessageId, MessageUpdateEvent, Ready,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::conversions::{message_snapshot, user_snapshot};
use super::error::DiscordResult;
use super::models::Topology;
use super::recipients::RecipientCache;
use super::recorder::{DeletionOutcome, EventRecorder};
use super::snapshots::{
    ChannelSnapshot, GuildChannelSnapshot, GuildSnapshot, MessageRef, PrivateChannelSnapshot,
};

/// Event handler that archives messages, edits and deletions.
pub struct PanopticonHandler {
    recorder: Arc<EventRecorder>,
    recipients: Arc<RecipientCache>,
}

impl PanopticonHandler {
    /// Create a handler over a recorder and a private-channel recipient cache.
    pub fn new(recorder: Arc<EventRecorder>, recipients: Arc<RecipientCache>) -> Self {
        Self {
            recorder,
            recipients,
        }
    }

    /// Gateway intents the archive needs.
    ///
    /// `MESSAGE_CONTENT` is privileged and must be enabled for the application
    /// in the Discord developer portal.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Resolve the channel a message was posted in.
    async fn resolve_channel(
        &self,
        ctx: &Context,
        message: &Message,
    ) -> DiscordResult<ChannelSnapshot> {
        match message.guild_id {
            Some(guild_id) => {
                self.resolve_guild_channel(ctx, guild_id, message.channel_id)
                    .await
            }
            None => Ok(self.resolve_private_channel(ctx, message).await),
        }
    }

    async fn resolve_guild_channel(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> DiscordResult<ChannelSnapshot> {
        let id = channel_id.get() as i64;

        // The cache guard must not live across an await point.
        let cached = ctx.cache.guild(guild_id).and_then(|guild| {
            guild
                .channels
                .get(&channel_id)
                .map(|channel| (guild.name.clone(), channel.name.clone(), channel.kind))
        });

        let (guild_name, channel_name, kind) = match cached {
            Some(found) => found,
            None => {
                debug!(guild_id = %guild_id, channel_id = %channel_id, "Channel not cached, fetching");
                let channel = match channel_id.to_channel(ctx).await? {
                    Channel::Guild(channel) => channel,
                    _ => return Ok(ChannelSnapshot::Unsupported { id }),
                };
                let guild = guild_id.to_partial_guild(ctx).await?;
                (guild.name, channel.name, channel.kind)
            }
        };

        if !matches!(kind, ChannelType::Text | ChannelType::News) {
            return Ok(ChannelSnapshot::Unsupported { id });
        }

        let guild = GuildSnapshot::new(guild_id.get() as i64, guild_name);
        Ok(ChannelSnapshot::Guild(GuildChannelSnapshot::new(
            id,
            guild,
            channel_name,
        )))
    }

    /// Resolve the other participant of a direct-message channel.
    ///
    /// Tries the author, then the recipient cache, then an HTTP fetch. An
    /// unresolved recipient is carried as `None`.
    async fn resolve_private_channel(&self, ctx: &Context, message: &Message) -> ChannelSnapshot {
        let id = message.channel_id.get() as i64;
        let self_id = self.recorder.session().self_id();
        let author = user_snapshot(&message.author);

        let recipient = if Some(*author.id()) != self_id {
            Some(author)
        } else if let Some(cached) = self.recipients.get(id) {
            Some(cached)
        } else {
            match message.channel_id.to_channel(ctx).await {
                Ok(Channel::Private(channel)) => Some(user_snapshot(&channel.recipient)),
                Ok(_) => return ChannelSnapshot::Unsupported { id },
                Err(e) => {
                    debug!(channel_id = id, error = %e, "Could not resolve private channel recipient");
                    None
                }
            }
        };

        if let Some(recipient) = &recipient {
            self.recipients.insert(id, recipient.clone());
        }

        ChannelSnapshot::Private(PrivateChannelSnapshot::new(id, recipient))
    }

    #[instrument(skip(self, ctx, message), fields(message_id = %message.id))]
    async fn record_message(&self, ctx: &Context, message: &Message) -> DiscordResult<usize> {
        let channel = self.resolve_channel(ctx, message).await?;
        let snapshot = message_snapshot(message, channel)?;
        Ok(self.recorder.on_message(&snapshot).await?)
    }

    #[instrument(skip(self, ctx, before, after), fields(message_id = %after.id))]
    async fn record_edit(
        &self,
        ctx: &Context,
        before: &Message,
        after: &Message,
    ) -> DiscordResult<bool> {
        let channel = self.resolve_channel(ctx, after).await?;
        let before = message_snapshot(before, channel.clone())?;
        let after = message_snapshot(after, channel)?;
        Ok(self.recorder.on_message_edit(&before, &after).await?)
    }
}

#[async_trait]
impl EventHandler for PanopticonHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord gateway"
        );

        let me = user_snapshot(&ready.user);
        if let Err(e) = self.recorder.on_ready(&me).await {
            error!(error = %e, "Failed to record bot user");
        }
    }

    async fn message(&self, ctx: Context, new_message: Message) {
        if let Err(e) = self.record_message(&ctx, &new_message).await {
            error!(message_id = %new_message.id, error = %e, "Failed to record message");
        }
    }

    async fn message_update(
        &self,
        ctx: Context,
        old_if_available: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        let (Some(before), Some(after)) = (old_if_available, new) else {
            debug!(message_id = %event.id, "Pre-edit message not cached, skipping edit");
            return;
        };

        if let Err(e) = self.record_edit(&ctx, &before, &after).await {
            error!(message_id = %event.id, error = %e, "Failed to record edit");
        }
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        let topology = match guild_id {
            Some(_) => Topology::Guild,
            None => Topology::Private,
        };
        let message = MessageRef::new(
            deleted_message_id.get() as i64,
            channel_id.get() as i64,
            topology,
        );

        match self.recorder.on_message_delete(&message).await {
            Ok(DeletionOutcome::Recorded) => {}
            Ok(DeletionOutcome::MessageMissing) => {
                debug!(message_id = %deleted_message_id, "Deleted message was never archived");
            }
            Err(e) => {
                error!(message_id = %deleted_message_id, error = %e, "Failed to record deletion");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intents_cover_guild_and_direct_messages() {
        let intents = PanopticonHandler::intents();
        assert!(intents.contains(GatewayIntents::GUILDS));
        assert!(intents.contains(GatewayIntents::GUILD_MESSAGES));
        assert!(intents.contains(GatewayIntents::DIRECT_MESSAGES));
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(!intents.contains(GatewayIntents::GUILD_MEMBERS));
    }
}
