//! Conversions from serenity models into event snapshots.

use chrono::{DateTime, NaiveDateTime};

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Creation time encoded in a Discord snowflake.
///
/// The top 42 bits of a snowflake are milliseconds since the Discord epoch.
///
/// # Example
/// ```
/// use panopticon_social::snowflake_timestamp;
///
/// let created = snowflake_timestamp(175928847299117063);
/// assert_eq!(created.to_string(), "2016-04-30 11:18:25.796");
/// ```
pub fn snowflake_timestamp(id: u64) -> NaiveDateTime {
    let millis = (id >> 22) as i64 + DISCORD_EPOCH_MS;
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .naive_utc()
}

#[cfg(feature = "discord")]
pub use self::serenity_models::*;

#[cfg(feature = "discord")]
mod serenity_models {
    use chrono::NaiveDateTime;
    use serenity::all::{Attachment, Embed, Message, Timestamp, User};

    use super::snowflake_timestamp;
    use crate::discord::error::{DiscordError, DiscordErrorKind, DiscordResult};
    use crate::discord::snapshots::{
        AttachmentSnapshot, ChannelSnapshot, EmbedSnapshot, MessageSnapshot, UserSnapshot,
    };

    /// Convert a serenity timestamp to a naive UTC time.
    pub fn naive_timestamp(timestamp: &Timestamp) -> NaiveDateTime {
        timestamp.naive_utc()
    }

    /// Snapshot of a user.
    pub fn user_snapshot(user: &User) -> UserSnapshot {
        UserSnapshot::new(
            user.id.get() as i64,
            snowflake_timestamp(user.id.get()),
            user.name.clone(),
            user.discriminator.map(|d| format!("{:04}", d.get())),
            user.bot,
        )
    }

    /// Snapshot of an embed, keeping its full JSON form.
    pub fn embed_snapshot(embed: &Embed) -> DiscordResult<EmbedSnapshot> {
        let payload = serde_json::to_value(embed).map_err(|e| {
            DiscordError::new(DiscordErrorKind::SerenityError(format!(
                "Failed to serialize embed: {}",
                e
            )))
        })?;
        Ok(EmbedSnapshot::new(embed.kind.clone(), payload))
    }

    /// Snapshot of an attachment.
    pub fn attachment_snapshot(attachment: &Attachment) -> AttachmentSnapshot {
        AttachmentSnapshot::new(
            attachment.id.get() as i64,
            u64::from(attachment.size),
            attachment.filename.clone(),
            attachment.url.clone(),
        )
    }

    /// Snapshot of a message posted in an already resolved channel.
    pub fn message_snapshot(
        message: &Message,
        channel: ChannelSnapshot,
    ) -> DiscordResult<MessageSnapshot> {
        let embeds = message
            .embeds
            .iter()
            .map(embed_snapshot)
            .collect::<DiscordResult<Vec<_>>>()?;

        Ok(MessageSnapshot::new(
            message.id.get() as i64,
            naive_timestamp(&message.timestamp),
            message.edited_timestamp.as_ref().map(naive_timestamp),
            channel,
            user_snapshot(&message.author),
            message.content.clone(),
            embeds,
            message.attachments.iter().map(attachment_snapshot).collect(),
        ))
    }
}
