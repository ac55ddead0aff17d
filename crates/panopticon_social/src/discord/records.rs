//! Persistence operations produced by the mapper.

use super::models::{
    NewAttachment, NewDeletion, NewEdit, NewGuild, NewGuildChannel, NewMessage,
    NewPrivateChannel, NewUser, Topology,
};

/// One write against the archive.
///
/// The conflict policy is part of the operation: upserts refresh mutable
/// columns, inserts ignore duplicates, and edits and deletions always append.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum RecordOp {
    /// Insert a user or refresh its name, discriminator and bot flag.
    UpsertUser(NewUser),
    /// Insert a guild or refresh its name.
    UpsertGuild(NewGuild),
    /// Insert a private channel; existing channels are left untouched.
    InsertPrivateChannel(NewPrivateChannel),
    /// Insert a guild channel or refresh its name.
    UpsertGuildChannel(NewGuildChannel),
    /// Insert a message; duplicates are ignored.
    #[from(ignore)]
    InsertMessage(Topology, NewMessage),
    /// Insert an attachment; duplicates are ignored.
    #[from(ignore)]
    InsertAttachment(Topology, NewAttachment),
    /// Append an edit history row.
    #[from(ignore)]
    InsertEdit(Topology, NewEdit),
    /// Append a deletion marker.
    #[from(ignore)]
    InsertDeletion(Topology, NewDeletion),
}

impl RecordOp {
    /// Table this operation writes to.
    pub fn table(&self) -> &'static str {
        match self {
            RecordOp::UpsertUser(_) => "users",
            RecordOp::UpsertGuild(_) => "guilds",
            RecordOp::InsertPrivateChannel(_) => "private_channels",
            RecordOp::UpsertGuildChannel(_) => "guild_channels",
            RecordOp::InsertMessage(Topology::Private, _) => "private_messages",
            RecordOp::InsertMessage(Topology::Guild, _) => "guild_messages",
            RecordOp::InsertAttachment(Topology::Private, _) => "private_attachments",
            RecordOp::InsertAttachment(Topology::Guild, _) => "guild_attachments",
            RecordOp::InsertEdit(Topology::Private, _) => "private_edits",
            RecordOp::InsertEdit(Topology::Guild, _) => "guild_edits",
            RecordOp::InsertDeletion(Topology::Private, _) => "private_deletions",
            RecordOp::InsertDeletion(Topology::Guild, _) => "guild_deletions",
        }
    }
}
