//! Translation of event snapshots into archive writes.
//!
//! Every function here is pure: it inspects a snapshot and returns the ordered
//! list of [`RecordOp`]s that must run in one transaction. Parents always come
//! before children (users and guilds, then channels, then messages, then
//! attachments) so foreign keys hold without pre-checks.

use chrono::Utc;
use serde_json::Value as JsonValue;

use super::models::{
    NewAttachment, NewDeletion, NewEdit, NewGuild, NewGuildChannel, NewMessage,
    NewPrivateChannel, NewUser, Topology,
};
use super::records::RecordOp;
use super::snapshots::{
    ChannelSnapshot, EmbedSnapshot, GuildChannelSnapshot, GuildSnapshot, MessageRef,
    MessageSnapshot, PrivateChannelSnapshot, UserSnapshot,
};

/// Embed type tag of author-constructed embeds.
pub const RICH_EMBED_KIND: &str = "rich";

/// Upsert for a user.
pub fn map_user(user: &UserSnapshot) -> RecordOp {
    RecordOp::UpsertUser(NewUser {
        user_id: *user.id(),
        created_at: *user.created_at(),
        name: user.name().clone(),
        discriminator: user.discriminator().clone(),
        bot: *user.bot(),
    })
}

/// Upsert for a guild.
pub fn map_guild(guild: &GuildSnapshot) -> RecordOp {
    RecordOp::UpsertGuild(NewGuild {
        guild_id: *guild.id(),
        name: guild.name().clone(),
    })
}

/// Insert for a private channel between `self_id` and the channel's recipient.
///
/// Returns `None` when the recipient could not be resolved.
pub fn map_private_channel(channel: &PrivateChannelSnapshot, self_id: i64) -> Option<RecordOp> {
    let recipient = channel.recipient().as_ref()?;
    Some(RecordOp::InsertPrivateChannel(NewPrivateChannel::canonical(
        *channel.id(),
        *recipient.id(),
        self_id,
    )))
}

/// Guild upsert followed by the channel upsert.
pub fn map_guild_channel(channel: &GuildChannelSnapshot) -> Vec<RecordOp> {
    vec![
        map_guild(channel.guild()),
        RecordOp::UpsertGuildChannel(NewGuildChannel {
            channel_id: *channel.id(),
            guild_id: *channel.guild().id(),
            name: channel.name().clone(),
        }),
    ]
}

/// Every write needed to archive a newly created message.
///
/// Returns an empty list for unsupported channels and for private channels
/// whose recipient is unknown.
pub fn map_message(message: &MessageSnapshot, self_id: i64) -> Vec<RecordOp> {
    let mut ops = Vec::new();

    let topology = match message.channel() {
        ChannelSnapshot::Private(channel) => {
            let Some(recipient) = channel.recipient() else {
                return ops;
            };
            let Some(channel_op) = map_private_channel(channel, self_id) else {
                return ops;
            };
            ops.push(map_user(recipient));
            if message.author().id() != recipient.id() {
                ops.push(map_user(message.author()));
            }
            ops.push(channel_op);
            Topology::Private
        }
        ChannelSnapshot::Guild(channel) => {
            ops.push(map_user(message.author()));
            ops.extend(map_guild_channel(channel));
            Topology::Guild
        }
        ChannelSnapshot::Unsupported { .. } => return ops,
    };

    ops.push(RecordOp::InsertMessage(
        topology,
        NewMessage {
            message_id: *message.id(),
            created_at: *message.created_at(),
            channel_id: message.channel().id(),
            author_id: *message.author().id(),
            content: message.content().clone(),
            embed: extract_rich_embed(message.embeds()),
        },
    ));

    ops.extend(message.attachments().iter().map(|attachment| {
        RecordOp::InsertAttachment(
            topology,
            NewAttachment {
                attachment_id: *attachment.id(),
                message_id: *message.id(),
                size: i64::try_from(*attachment.size()).unwrap_or(i64::MAX),
                filename: attachment.filename().clone(),
                url: attachment.url().clone(),
            },
        )
    }));

    ops
}

/// Edit history entry, if the edit changed anything that is archived.
///
/// Only the text content and the rich embed are compared; pin, flag and
/// non-rich embed changes produce nothing. A missing edit timestamp falls back
/// to the current UTC time.
pub fn map_edit(before: &MessageSnapshot, after: &MessageSnapshot) -> Option<RecordOp> {
    let topology = after.channel().topology()?;

    let embed = extract_rich_embed(after.embeds());
    if before.content() == after.content() && extract_rich_embed(before.embeds()) == embed {
        return None;
    }

    let edited_at = after
        .edited_at()
        .unwrap_or_else(|| Utc::now().naive_utc());

    Some(RecordOp::InsertEdit(
        topology,
        NewEdit {
            message_id: *after.id(),
            edited_at,
            content: after.content().clone(),
            embed,
        },
    ))
}

/// Deletion marker for a message.
pub fn map_deletion(message: &MessageRef) -> RecordOp {
    RecordOp::InsertDeletion(
        *message.topology(),
        NewDeletion {
            message_id: *message.id(),
        },
    )
}

/// The first embed tagged `rich`, serialized; later rich embeds are ignored.
pub fn extract_rich_embed(embeds: &[EmbedSnapshot]) -> Option<JsonValue> {
    embeds
        .iter()
        .find(|embed| embed.kind().as_deref() == Some(RICH_EMBED_KIND))
        .map(|embed| embed.payload().clone())
}
