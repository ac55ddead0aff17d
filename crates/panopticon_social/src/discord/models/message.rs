//! Message, attachment, edit and deletion models.
//!
//! Each of these entities lives in a pair of identically shaped tables, one per
//! [`Topology`]. The insert structs are plain values; the repository picks the
//! target table from the topology at write time. The row structs are
//! `Queryable` by position, so one struct reads either table of a pair.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Which family of tables a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Direct message between the bot and one user.
    #[display("private")]
    Private,
    /// Text channel inside a guild.
    #[display("guild")]
    Guild,
}

/// A message to insert into `private_messages` or `guild_messages`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub message_id: i64,
    pub created_at: NaiveDateTime,
    pub channel_id: i64,
    pub author_id: i64,
    pub content: String,
    pub embed: Option<JsonValue>,
}

/// Row of `private_messages` or `guild_messages`.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct MessageRow {
    pub message_id: i64,
    pub created_at: NaiveDateTime,
    pub channel_id: i64,
    pub author_id: i64,
    pub content: String,
    pub embed: Option<JsonValue>,
}

/// An attachment to insert into `private_attachments` or `guild_attachments`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub attachment_id: i64,
    pub message_id: i64,
    pub size: i64,
    pub filename: String,
    pub url: String,
}

/// Row of `private_attachments` or `guild_attachments`.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct AttachmentRow {
    pub attachment_id: i64,
    pub message_id: i64,
    pub size: i64,
    pub filename: String,
    pub url: String,
}

/// An edit history entry for `private_edits` or `guild_edits`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEdit {
    pub message_id: i64,
    pub edited_at: NaiveDateTime,
    pub content: String,
    pub embed: Option<JsonValue>,
}

/// Row of `private_edits` or `guild_edits`.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct EditRow {
    pub edit_id: i64,
    pub message_id: i64,
    pub edited_at: NaiveDateTime,
    pub content: String,
    pub embed: Option<JsonValue>,
}

/// A deletion marker for `private_deletions` or `guild_deletions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDeletion {
    pub message_id: i64,
}

/// Row of `private_deletions` or `guild_deletions`.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct DeletionRow {
    pub deletion_id: i64,
    pub message_id: i64,
    pub recorded_at: NaiveDateTime,
}
