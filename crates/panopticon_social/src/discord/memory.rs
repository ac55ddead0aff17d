//! In-memory archive for tests and dry runs.
//!
//! Mirrors the PostgreSQL conflict policies and foreign keys closely enough that
//! event handling can be exercised without a database: upserts refresh the
//! same columns, duplicate inserts are ignored, a batch is all-or-nothing, and
//! every foreign key of the real schema is checked and reported under the same
//! constraint name PostgreSQL would use.

use async_trait::async_trait;
use chrono::Utc;
use panopticon_database::{GUILD_DELETION_MESSAGE_FK, PRIVATE_DELETION_MESSAGE_FK};
use panopticon_error::{DatabaseError, DatabaseErrorKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{
    AttachmentRow, DeletionRow, EditRow, GuildChannelRow, GuildRow, MessageRow,
    PrivateChannelRow, Topology, UserRow,
};
use super::records::RecordOp;
use super::sink::{ArchiveResult, RecordSink};

/// Tables that exist once per topology.
#[derive(Debug, Clone, Default)]
struct TopologyTables {
    messages: BTreeMap<i64, MessageRow>,
    attachments: BTreeMap<i64, AttachmentRow>,
    edits: Vec<EditRow>,
    deletions: Vec<DeletionRow>,
}

#[derive(Debug, Clone, Default)]
struct ArchiveState {
    users: BTreeMap<i64, UserRow>,
    guilds: BTreeMap<i64, GuildRow>,
    private_channels: BTreeMap<i64, PrivateChannelRow>,
    guild_channels: BTreeMap<i64, GuildChannelRow>,
    private: TopologyTables,
    guild: TopologyTables,
    next_serial: i64,
}

#[track_caller]
fn foreign_key(constraint: &str, key: i64) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation {
        constraint: Some(constraint.to_string()),
        message: format!("Key ({}) is not present in the referenced table", key),
    })
}

impl ArchiveState {
    fn tables(&self, topology: Topology) -> &TopologyTables {
        match topology {
            Topology::Private => &self.private,
            Topology::Guild => &self.guild,
        }
    }

    fn tables_mut(&mut self, topology: Topology) -> &mut TopologyTables {
        match topology {
            Topology::Private => &mut self.private,
            Topology::Guild => &mut self.guild,
        }
    }

    fn serial(&mut self) -> i64 {
        self.next_serial += 1;
        self.next_serial
    }

    fn require_user(&self, user_id: i64, constraint: &str) -> ArchiveResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(foreign_key(constraint, user_id))
        }
    }

    fn apply(&mut self, op: &RecordOp) -> ArchiveResult<usize> {
        let now = Utc::now().naive_utc();

        match op {
            RecordOp::UpsertUser(user) => {
                self.users
                    .entry(user.user_id)
                    .and_modify(|row| {
                        row.name = user.name.clone();
                        row.discriminator = user.discriminator.clone();
                        row.bot = user.bot;
                        row.last_updated = now;
                    })
                    .or_insert_with(|| UserRow {
                        user_id: user.user_id,
                        created_at: user.created_at,
                        name: user.name.clone(),
                        discriminator: user.discriminator.clone(),
                        bot: user.bot,
                        last_updated: now,
                    });
                Ok(1)
            }
            RecordOp::UpsertGuild(guild) => {
                self.guilds.insert(
                    guild.guild_id,
                    GuildRow {
                        guild_id: guild.guild_id,
                        name: guild.name.clone(),
                        last_updated: now,
                    },
                );
                Ok(1)
            }
            RecordOp::InsertPrivateChannel(channel) => {
                if self.private_channels.contains_key(&channel.channel_id) {
                    return Ok(0);
                }
                self.require_user(channel.first_user_id, "private_channels_first_user_id_fkey")?;
                self.require_user(channel.second_user_id, "private_channels_second_user_id_fkey")?;
                self.private_channels.insert(
                    channel.channel_id,
                    PrivateChannelRow {
                        channel_id: channel.channel_id,
                        first_user_id: channel.first_user_id,
                        second_user_id: channel.second_user_id,
                    },
                );
                Ok(1)
            }
            RecordOp::UpsertGuildChannel(channel) => {
                if !self.guilds.contains_key(&channel.guild_id) {
                    return Err(foreign_key("guild_channels_guild_id_fkey", channel.guild_id));
                }
                self.guild_channels.insert(
                    channel.channel_id,
                    GuildChannelRow {
                        channel_id: channel.channel_id,
                        guild_id: channel.guild_id,
                        name: channel.name.clone(),
                        last_updated: now,
                    },
                );
                Ok(1)
            }
            RecordOp::InsertMessage(topology, message) => {
                if self.tables(*topology).messages.contains_key(&message.message_id) {
                    return Ok(0);
                }
                let channel_known = match topology {
                    Topology::Private => self.private_channels.contains_key(&message.channel_id),
                    Topology::Guild => self.guild_channels.contains_key(&message.channel_id),
                };
                if !channel_known {
                    return Err(foreign_key(
                        &format!("{}_messages_channel_id_fkey", topology),
                        message.channel_id,
                    ));
                }
                self.require_user(
                    message.author_id,
                    &format!("{}_messages_author_id_fkey", topology),
                )?;
                self.tables_mut(*topology).messages.insert(
                    message.message_id,
                    MessageRow {
                        message_id: message.message_id,
                        created_at: message.created_at,
                        channel_id: message.channel_id,
                        author_id: message.author_id,
                        content: message.content.clone(),
                        embed: message.embed.clone(),
                    },
                );
                Ok(1)
            }
            RecordOp::InsertAttachment(topology, attachment) => {
                let tables = self.tables_mut(*topology);
                if tables.attachments.contains_key(&attachment.attachment_id) {
                    return Ok(0);
                }
                if !tables.messages.contains_key(&attachment.message_id) {
                    return Err(foreign_key(
                        &format!("{}_attachments_message_id_fkey", topology),
                        attachment.message_id,
                    ));
                }
                tables.attachments.insert(
                    attachment.attachment_id,
                    AttachmentRow {
                        attachment_id: attachment.attachment_id,
                        message_id: attachment.message_id,
                        size: attachment.size,
                        filename: attachment.filename.clone(),
                        url: attachment.url.clone(),
                    },
                );
                Ok(1)
            }
            RecordOp::InsertEdit(topology, edit) => {
                let edit_id = self.serial();
                self.tables_mut(*topology).edits.push(EditRow {
                    edit_id,
                    message_id: edit.message_id,
                    edited_at: edit.edited_at,
                    content: edit.content.clone(),
                    embed: edit.embed.clone(),
                });
                Ok(1)
            }
            RecordOp::InsertDeletion(topology, deletion) => {
                if !self.tables(*topology).messages.contains_key(&deletion.message_id) {
                    let constraint = match topology {
                        Topology::Private => PRIVATE_DELETION_MESSAGE_FK,
                        Topology::Guild => GUILD_DELETION_MESSAGE_FK,
                    };
                    return Err(foreign_key(constraint, deletion.message_id));
                }
                let deletion_id = self.serial();
                self.tables_mut(*topology).deletions.push(DeletionRow {
                    deletion_id,
                    message_id: deletion.message_id,
                    recorded_at: now,
                });
                Ok(1)
            }
        }
    }
}

/// Archive held entirely in memory.
///
/// Cloning shares the underlying storage.
///
/// # Example
/// ```
/// use panopticon_social::InMemoryArchive;
///
/// let archive = InMemoryArchive::new();
/// // Hand `archive.clone()` to an EventRecorder and inspect `archive` afterwards.
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchive {
    state: Arc<RwLock<ArchiveState>>,
}

impl InMemoryArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a user by ID.
    pub async fn user(&self, user_id: i64) -> Option<UserRow> {
        self.state.read().await.users.get(&user_id).cloned()
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Get a guild by ID.
    pub async fn guild(&self, guild_id: i64) -> Option<GuildRow> {
        self.state.read().await.guilds.get(&guild_id).cloned()
    }

    /// Get a private channel by ID.
    pub async fn private_channel(&self, channel_id: i64) -> Option<PrivateChannelRow> {
        self.state
            .read()
            .await
            .private_channels
            .get(&channel_id)
            .cloned()
    }

    /// Get a guild channel by ID.
    pub async fn guild_channel(&self, channel_id: i64) -> Option<GuildChannelRow> {
        self.state
            .read()
            .await
            .guild_channels
            .get(&channel_id)
            .cloned()
    }

    /// All messages of one topology, ordered by ID.
    pub async fn messages(&self, topology: Topology) -> Vec<MessageRow> {
        self.state
            .read()
            .await
            .tables(topology)
            .messages
            .values()
            .cloned()
            .collect()
    }

    /// Attachments of one message, ordered by ID.
    pub async fn attachments(&self, topology: Topology, message_id: i64) -> Vec<AttachmentRow> {
        self.state
            .read()
            .await
            .tables(topology)
            .attachments
            .values()
            .filter(|row| row.message_id == message_id)
            .cloned()
            .collect()
    }

    /// Edit history of one message in insertion order.
    pub async fn edits(&self, topology: Topology, message_id: i64) -> Vec<EditRow> {
        self.state
            .read()
            .await
            .tables(topology)
            .edits
            .iter()
            .filter(|row| row.message_id == message_id)
            .cloned()
            .collect()
    }

    /// Deletion markers of one message.
    pub async fn deletions(&self, topology: Topology, message_id: i64) -> Vec<DeletionRow> {
        self.state
            .read()
            .await
            .tables(topology)
            .deletions
            .iter()
            .filter(|row| row.message_id == message_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordSink for InMemoryArchive {
    async fn apply(&self, ops: Vec<RecordOp>) -> ArchiveResult<usize> {
        let mut state = self.state.write().await;

        // Work on a copy so a failing op leaves no partial batch behind.
        let mut staged = state.clone();
        let mut written = 0;
        for op in &ops {
            written += staged.apply(op)?;
        }
        *state = staged;
        Ok(written)
    }
}
