//! PostgreSQL repository for archived Discord data.
//!
//! Writes arrive as [`RecordOp`] batches from the event recorder. Each batch
//! checks one connection out of the pool and runs inside a single transaction
//! on a blocking thread, since diesel connections are synchronous.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use panopticon_database::PgPool;
use panopticon_database::schema::{
    guild_attachments, guild_channels, guild_deletions, guild_edits, guild_messages, guilds,
    private_attachments, private_channels, private_deletions, private_edits, private_messages,
    users,
};
use panopticon_error::{DatabaseError, DatabaseErrorKind};
use tracing::{debug, instrument};

use super::models::{
    AttachmentRow, DeletionRow, EditRow, GuildChannelRow, GuildRow, MessageRow,
    PrivateChannelRow, Topology, UserRow,
};
use super::records::RecordOp;
use super::sink::{ArchiveResult, RecordSink};

/// Insert a message-shaped value into one table of a topology pair.
macro_rules! insert_message {
    ($table:ident, $row:expr, $conn:expr) => {
        diesel::insert_into($table::table)
            .values((
                $table::message_id.eq($row.message_id),
                $table::created_at.eq($row.created_at),
                $table::channel_id.eq($row.channel_id),
                $table::author_id.eq($row.author_id),
                $table::content.eq(&$row.content),
                $table::embed.eq($row.embed.clone()),
            ))
            .on_conflict($table::message_id)
            .do_nothing()
            .execute($conn)
    };
}

macro_rules! insert_attachment {
    ($table:ident, $row:expr, $conn:expr) => {
        diesel::insert_into($table::table)
            .values((
                $table::attachment_id.eq($row.attachment_id),
                $table::message_id.eq($row.message_id),
                $table::size.eq($row.size),
                $table::filename.eq(&$row.filename),
                $table::url.eq(&$row.url),
            ))
            .on_conflict($table::attachment_id)
            .do_nothing()
            .execute($conn)
    };
}

macro_rules! insert_edit {
    ($table:ident, $row:expr, $conn:expr) => {
        diesel::insert_into($table::table)
            .values((
                $table::message_id.eq($row.message_id),
                $table::edited_at.eq($row.edited_at),
                $table::content.eq(&$row.content),
                $table::embed.eq($row.embed.clone()),
            ))
            .execute($conn)
    };
}

/// PostgreSQL repository for archived Discord data.
///
/// # Example
/// ```no_run
/// use panopticon_database::establish_pool;
/// use panopticon_social::ArchiveRepository;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = establish_pool("postgres://localhost/panopticon", 10)?;
/// let repository = ArchiveRepository::new(pool);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ArchiveRepository {
    pool: PgPool,
}

impl ArchiveRepository {
    /// Create a repository over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    ///
    /// The connection returns to the pool when `f` finishes, whatever the
    /// outcome.
    async fn with_conn<T, F>(&self, f: F) -> ArchiveResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> ArchiveResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::TaskJoin(e.to_string())))?
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> ArchiveResult<Option<UserRow>> {
        self.with_conn(move |conn| {
            users::table
                .find(user_id)
                .select(UserRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Get a guild by ID.
    #[instrument(skip(self))]
    pub async fn get_guild(&self, guild_id: i64) -> ArchiveResult<Option<GuildRow>> {
        self.with_conn(move |conn| {
            guilds::table
                .find(guild_id)
                .select(GuildRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Get a private channel by ID.
    #[instrument(skip(self))]
    pub async fn get_private_channel(
        &self,
        channel_id: i64,
    ) -> ArchiveResult<Option<PrivateChannelRow>> {
        self.with_conn(move |conn| {
            private_channels::table
                .find(channel_id)
                .select(PrivateChannelRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Find the private channel between two users, in either order.
    #[instrument(skip(self))]
    pub async fn find_private_channel_between(
        &self,
        a: i64,
        b: i64,
    ) -> ArchiveResult<Option<PrivateChannelRow>> {
        self.with_conn(move |conn| {
            private_channels::table
                .filter(private_channels::first_user_id.eq(a.min(b)))
                .filter(private_channels::second_user_id.eq(a.max(b)))
                .select(PrivateChannelRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Get a guild channel by ID.
    #[instrument(skip(self))]
    pub async fn get_guild_channel(
        &self,
        channel_id: i64,
    ) -> ArchiveResult<Option<GuildChannelRow>> {
        self.with_conn(move |conn| {
            guild_channels::table
                .find(channel_id)
                .select(GuildChannelRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
    }

    /// Get a message by ID.
    #[instrument(skip(self))]
    pub async fn get_message(
        &self,
        topology: Topology,
        message_id: i64,
    ) -> ArchiveResult<Option<MessageRow>> {
        self.with_conn(move |conn| {
            let result = match topology {
                Topology::Private => private_messages::table
                    .find(message_id)
                    .first::<MessageRow>(conn),
                Topology::Guild => guild_messages::table
                    .find(message_id)
                    .first::<MessageRow>(conn),
            };
            result.optional().map_err(DatabaseError::from)
        })
        .await
    }

    /// List a message's attachments.
    #[instrument(skip(self))]
    pub async fn list_attachments(
        &self,
        topology: Topology,
        message_id: i64,
    ) -> ArchiveResult<Vec<AttachmentRow>> {
        self.with_conn(move |conn| {
            let result = match topology {
                Topology::Private => private_attachments::table
                    .filter(private_attachments::message_id.eq(message_id))
                    .order(private_attachments::attachment_id.asc())
                    .load::<AttachmentRow>(conn),
                Topology::Guild => guild_attachments::table
                    .filter(guild_attachments::message_id.eq(message_id))
                    .order(guild_attachments::attachment_id.asc())
                    .load::<AttachmentRow>(conn),
            };
            result.map_err(DatabaseError::from)
        })
        .await
    }

    /// List a message's edit history, oldest first.
    #[instrument(skip(self))]
    pub async fn list_edits(
        &self,
        topology: Topology,
        message_id: i64,
    ) -> ArchiveResult<Vec<EditRow>> {
        self.with_conn(move |conn| {
            let result = match topology {
                Topology::Private => private_edits::table
                    .filter(private_edits::message_id.eq(message_id))
                    .order(private_edits::edit_id.asc())
                    .load::<EditRow>(conn),
                Topology::Guild => guild_edits::table
                    .filter(guild_edits::message_id.eq(message_id))
                    .order(guild_edits::edit_id.asc())
                    .load::<EditRow>(conn),
            };
            result.map_err(DatabaseError::from)
        })
        .await
    }

    /// List the deletion markers recorded for a message.
    #[instrument(skip(self))]
    pub async fn list_deletions(
        &self,
        topology: Topology,
        message_id: i64,
    ) -> ArchiveResult<Vec<DeletionRow>> {
        self.with_conn(move |conn| {
            let result = match topology {
                Topology::Private => private_deletions::table
                    .filter(private_deletions::message_id.eq(message_id))
                    .load::<DeletionRow>(conn),
                Topology::Guild => guild_deletions::table
                    .filter(guild_deletions::message_id.eq(message_id))
                    .load::<DeletionRow>(conn),
            };
            result.map_err(DatabaseError::from)
        })
        .await
    }
}

/// Execute one operation on an open transaction.
fn apply_op(conn: &mut PgConnection, op: &RecordOp) -> QueryResult<usize> {
    match op {
        RecordOp::UpsertUser(user) => diesel::insert_into(users::table)
            .values(user)
            .on_conflict(users::user_id)
            .do_update()
            .set((
                users::name.eq(&user.name),
                users::discriminator.eq(&user.discriminator),
                users::bot.eq(user.bot),
                users::last_updated.eq(diesel::dsl::now),
            ))
            .execute(conn),
        RecordOp::UpsertGuild(guild) => diesel::insert_into(guilds::table)
            .values(guild)
            .on_conflict(guilds::guild_id)
            .do_update()
            .set((
                guilds::name.eq(&guild.name),
                guilds::last_updated.eq(diesel::dsl::now),
            ))
            .execute(conn),
        RecordOp::InsertPrivateChannel(channel) => diesel::insert_into(private_channels::table)
            .values(channel)
            .on_conflict(private_channels::channel_id)
            .do_nothing()
            .execute(conn),
        RecordOp::UpsertGuildChannel(channel) => diesel::insert_into(guild_channels::table)
            .values(channel)
            .on_conflict(guild_channels::channel_id)
            .do_update()
            .set((
                guild_channels::name.eq(&channel.name),
                guild_channels::last_updated.eq(diesel::dsl::now),
            ))
            .execute(conn),
        RecordOp::InsertMessage(Topology::Private, message) => {
            insert_message!(private_messages, message, conn)
        }
        RecordOp::InsertMessage(Topology::Guild, message) => {
            insert_message!(guild_messages, message, conn)
        }
        RecordOp::InsertAttachment(Topology::Private, attachment) => {
            insert_attachment!(private_attachments, attachment, conn)
        }
        RecordOp::InsertAttachment(Topology::Guild, attachment) => {
            insert_attachment!(guild_attachments, attachment, conn)
        }
        RecordOp::InsertEdit(Topology::Private, edit) => insert_edit!(private_edits, edit, conn),
        RecordOp::InsertEdit(Topology::Guild, edit) => insert_edit!(guild_edits, edit, conn),
        RecordOp::InsertDeletion(Topology::Private, deletion) => {
            diesel::insert_into(private_deletions::table)
                .values(private_deletions::message_id.eq(deletion.message_id))
                .execute(conn)
        }
        RecordOp::InsertDeletion(Topology::Guild, deletion) => {
            diesel::insert_into(guild_deletions::table)
                .values(guild_deletions::message_id.eq(deletion.message_id))
                .execute(conn)
        }
    }
}

#[async_trait]
impl RecordSink for ArchiveRepository {
    #[instrument(skip(self, ops), fields(ops = ops.len()))]
    async fn apply(&self, ops: Vec<RecordOp>) -> ArchiveResult<usize> {
        if ops.is_empty() {
            return Ok(0);
        }

        self.with_conn(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                let mut written = 0;
                for op in &ops {
                    let rows = apply_op(conn, op)?;
                    debug!(table = op.table(), rows, "Applied record");
                    written += rows;
                }
                Ok(written)
            })
        })
        .await
    }
}
