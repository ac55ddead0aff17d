//! Platform-neutral snapshots of gateway event payloads.
//!
//! The serenity handler converts gateway models into these plain values before
//! anything touches the database. Keeping them separate from serenity's types
//! lets the mapper and recorder run (and be tested) without a live gateway.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use serde_json::Value as JsonValue;

use super::models::Topology;

/// A user as seen in an event.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder, derive_new::new)]
#[builder(setter(into))]
pub struct UserSnapshot {
    /// Discord snowflake ID
    id: i64,
    /// Account creation time, derived from the snowflake
    created_at: NaiveDateTime,
    /// Username
    name: String,
    /// Legacy four digit discriminator, if the account still has one
    #[builder(default)]
    discriminator: Option<String>,
    /// Whether the account is a bot
    #[builder(default)]
    bot: bool,
}

/// A guild referenced by an event.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder, derive_new::new)]
#[builder(setter(into))]
pub struct GuildSnapshot {
    /// Discord snowflake ID
    id: i64,
    /// Guild name
    name: String,
}

/// A direct message channel between the bot and one recipient.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder, derive_new::new)]
#[builder(setter(into))]
pub struct PrivateChannelSnapshot {
    /// Discord snowflake ID
    id: i64,
    /// The other participant; `None` when it could not be resolved
    #[builder(default)]
    recipient: Option<UserSnapshot>,
}

/// A text channel inside a guild.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder, derive_new::new)]
#[builder(setter(into))]
pub struct GuildChannelSnapshot {
    /// Discord snowflake ID
    id: i64,
    /// Owning guild
    guild: GuildSnapshot,
    /// Channel name
    name: String,
}

/// The channel a message was posted in.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSnapshot {
    /// Direct message channel
    Private(PrivateChannelSnapshot),
    /// Guild text or announcement channel
    Guild(GuildChannelSnapshot),
    /// Any other channel kind (threads, voice, forums, group DMs); never archived
    Unsupported {
        /// Discord snowflake ID
        id: i64,
    },
}

impl ChannelSnapshot {
    /// The channel's snowflake ID regardless of variant.
    pub fn id(&self) -> i64 {
        match self {
            ChannelSnapshot::Private(channel) => *channel.id(),
            ChannelSnapshot::Guild(channel) => *channel.id(),
            ChannelSnapshot::Unsupported { id } => *id,
        }
    }

    /// The table family this channel's messages go to, if archived at all.
    pub fn topology(&self) -> Option<Topology> {
        match self {
            ChannelSnapshot::Private(_) => Some(Topology::Private),
            ChannelSnapshot::Guild(_) => Some(Topology::Guild),
            ChannelSnapshot::Unsupported { .. } => None,
        }
    }
}

/// An embed attached to a message.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder, derive_new::new)]
#[builder(setter(into))]
pub struct EmbedSnapshot {
    /// The embed type tag (`rich`, `image`, `video`, `link`, ...)
    #[builder(default)]
    kind: Option<String>,
    /// The full embed as JSON
    payload: JsonValue,
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder, derive_new::new)]
#[builder(setter(into))]
pub struct AttachmentSnapshot {
    /// Discord snowflake ID
    id: i64,
    /// Size in bytes
    size: u64,
    /// Original filename
    filename: String,
    /// CDN URL
    url: String,
}

/// A message as delivered by a create or update event.
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder, derive_new::new)]
#[builder(setter(into))]
pub struct MessageSnapshot {
    /// Discord snowflake ID
    id: i64,
    /// Time the message was sent
    created_at: NaiveDateTime,
    /// Time of the latest edit, when the platform reports one
    #[builder(default)]
    edited_at: Option<NaiveDateTime>,
    /// Channel the message was posted in
    channel: ChannelSnapshot,
    /// Message author
    author: UserSnapshot,
    /// Text content
    #[builder(default)]
    content: String,
    /// Embeds in delivery order
    #[builder(default)]
    embeds: Vec<EmbedSnapshot>,
    /// Attachments in delivery order
    #[builder(default)]
    attachments: Vec<AttachmentSnapshot>,
}

/// Identity of a deleted message.
///
/// Delete events only carry ids, so the topology comes from whether the event
/// named a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct MessageRef {
    /// Discord snowflake ID of the message
    id: i64,
    /// Channel the message was in
    channel_id: i64,
    /// Table family of the message
    topology: Topology,
}

impl MessageRef {
    /// Create a reference to a message.
    pub fn new(id: i64, channel_id: i64, topology: Topology) -> Self {
        Self {
            id,
            channel_id,
            topology,
        }
    }
}
