//! Per-event archive operations.
//!
//! Each gateway event maps to one method here. A method maps its snapshots into
//! [`RecordOp`]s and hands the whole batch to the sink, which applies it in one
//! transaction. Methods share nothing but the sink and the session state, so
//! serenity may run them concurrently.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::mapper::{map_deletion, map_edit, map_message, map_user};
use super::models::Topology;
use super::records::RecordOp;
use super::session::SessionState;
use super::sink::{ArchiveResult, RecordSink};
use super::snapshots::{MessageRef, MessageSnapshot, UserSnapshot};
use panopticon_database::{GUILD_DELETION_MESSAGE_FK, PRIVATE_DELETION_MESSAGE_FK};

/// What happened to a deletion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// A deletion marker was written.
    Recorded,
    /// The message was never archived, so there is nothing to mark.
    MessageMissing,
}

/// Turns gateway events into archive writes.
pub struct EventRecorder {
    sink: Arc<dyn RecordSink>,
    session: Arc<SessionState>,
}

impl EventRecorder {
    /// Create a recorder writing to `sink`.
    pub fn new(sink: Arc<dyn RecordSink>, session: Arc<SessionState>) -> Self {
        Self { sink, session }
    }

    /// The session state shared with the gateway handler.
    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Register the bot's own user on the first `ready` of the process.
    ///
    /// Returns `false` without writing when the session is already connected.
    #[instrument(skip(self, me), fields(user_id = %me.id()))]
    pub async fn on_ready(&self, me: &UserSnapshot) -> ArchiveResult<bool> {
        if self.session.is_connected() {
            debug!("Session already connected, skipping self registration");
            return Ok(false);
        }

        self.sink.apply(vec![map_user(me)]).await?;
        self.session.mark_connected(*me.id());
        info!(name = %me.name(), "Ready");
        Ok(true)
    }

    /// Archive a newly created message with its author, channel and attachments.
    ///
    /// Returns the number of rows written.
    #[instrument(skip(self, message), fields(message_id = %message.id(), channel_id = message.channel().id()))]
    pub async fn on_message(&self, message: &MessageSnapshot) -> ArchiveResult<usize> {
        let Some(self_id) = self.session.self_id() else {
            warn!("Message received before ready, skipping");
            return Ok(0);
        };

        let ops = map_message(message, self_id);
        if ops.is_empty() {
            debug!("Message is not archivable");
            return Ok(0);
        }
        self.sink.apply(ops).await
    }

    /// Append an edit history row if the edit changed content or the rich embed.
    ///
    /// Returns whether a row was written.
    #[instrument(skip(self, before, after), fields(message_id = %after.id()))]
    pub async fn on_message_edit(
        &self,
        before: &MessageSnapshot,
        after: &MessageSnapshot,
    ) -> ArchiveResult<bool> {
        let Some(op) = map_edit(before, after) else {
            debug!("Edit changed nothing archived");
            return Ok(false);
        };
        self.sink.apply(vec![op]).await?;
        Ok(true)
    }

    /// Append a deletion marker for a message.
    ///
    /// A delete can overtake the insert of the message it refers to, or refer
    /// to a message that was never archived. The deletion foreign key then
    /// rejects the row; that one violation is reported as
    /// [`DeletionOutcome::MessageMissing`] and every other error propagates.
    #[instrument(skip(self), fields(message_id = %message.id(), topology = %message.topology()))]
    pub async fn on_message_delete(&self, message: &MessageRef) -> ArchiveResult<DeletionOutcome> {
        let op: RecordOp = map_deletion(message);
        match self.sink.apply(vec![op]).await {
            Ok(_) => Ok(DeletionOutcome::Recorded),
            Err(e) if e.is_foreign_key_violation_on(deletion_constraint(*message.topology())) => {
                debug!("Deleted message was never archived");
                Ok(DeletionOutcome::MessageMissing)
            }
            Err(e) => Err(e),
        }
    }
}

fn deletion_constraint(topology: Topology) -> &'static str {
    match topology {
        Topology::Private => PRIVATE_DELETION_MESSAGE_FK,
        Topology::Guild => GUILD_DELETION_MESSAGE_FK,
    }
}
