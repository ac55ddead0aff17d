//! Event recorder tests against the in-memory archive


use archive_test_helpers::{
    BOT_ID, TestResult, at, bot_user, embed, guild_channel, message, private_channel,
    ready_recorder, user,
};
use async_trait::async_trait;
use panopticon_error::{DatabaseError, DatabaseErrorKind};
use panopticon_social::{
    ArchiveResult, DeletionOutcome, EventRecorder, InMemoryArchive, MessageRef, RecordOp,
    RecordSink, SessionState, Topology, UserSnapshot,
};
use std::sync::Arc;

/// Sink that rejects every batch with the same error.
struct RejectingSink(DatabaseErrorKind);

#[async_trait]
impl RecordSink for RejectingSink {
    async fn apply(&self, _ops: Vec<RecordOp>) -> ArchiveResult<usize> {
        Err(DatabaseError::new(self.0.clone()))
    }
}

fn rejecting_recorder(kind: DatabaseErrorKind) -> EventRecorder {
    EventRecorder::new(Arc::new(RejectingSink(kind)), Arc::new(SessionState::new()))
}

fn foreign_key(constraint: &str) -> DatabaseErrorKind {
    DatabaseErrorKind::ForeignKeyViolation {
        constraint: Some(constraint.to_string()),
        message: format!("insert violates foreign key constraint \"{}\"", constraint),
    }
}

#[tokio::test]
async fn test_ready_registers_bot_once() -> TestResult {
    let archive = Arc::new(InMemoryArchive::new());
    let session = Arc::new(SessionState::new());
    let recorder = EventRecorder::new(archive.clone(), session.clone());

    assert!(recorder.on_ready(&bot_user()).await?);
    assert!(session.is_connected());
    assert_eq!(session.self_id(), Some(BOT_ID));
    assert_eq!(archive.user_count().await, 1);
    assert!(archive.user(BOT_ID).await.is_some());

    // Re-identify after a resume must not write again
    let renamed = UserSnapshot::new(BOT_ID, at(1, 0), "renamed".into(), None, true);
    assert!(!recorder.on_ready(&renamed).await?);
    assert_eq!(archive.user(BOT_ID).await.map(|u| u.name), Some("panopticon".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_message_before_ready_is_skipped() -> TestResult {
    let archive = Arc::new(InMemoryArchive::new());
    let recorder = EventRecorder::new(archive.clone(), Arc::new(SessionState::new()));

    let msg = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "hi").build()?;
    assert_eq!(recorder.on_message(&msg).await?, 0);
    assert!(archive.messages(Topology::Guild).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_guild_message_end_to_end() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;
    assert_eq!(archive.user_count().await, 1);

    let msg = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "hi").build()?;
    recorder.on_message(&msg).await?;

    let guild = archive.guild(1).await.ok_or("guild G1 missing")?;
    assert_eq!(guild.name, "guild-1");
    let channel = archive.guild_channel(7).await.ok_or("channel C7 missing")?;
    assert_eq!(channel.guild_id, 1);
    assert_eq!(channel.name, "general");
    assert!(archive.user(42).await.is_some());

    let messages = archive.messages(Topology::Guild).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_id, 100);
    assert_eq!(messages[0].channel_id, 7);
    assert_eq!(messages[0].author_id, 42);
    assert_eq!(messages[0].content, "hi");
    assert!(messages[0].embed.is_none());
    assert!(archive.messages(Topology::Private).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_user_refresh_keeps_creation_time() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;
    let channel = guild_channel(1, 7, "general");

    let first = message(100, channel.clone(), user(42, "alice"), "one").build()?;
    recorder.on_message(&first).await?;
    let stored = archive.user(42).await.ok_or("user missing")?;

    let renamed = UserSnapshot::new(42, at(20, 0), "alicia".into(), None, true);
    let second = message(101, channel, renamed, "two").build()?;
    recorder.on_message(&second).await?;

    let refreshed = archive.user(42).await.ok_or("user missing")?;
    assert_eq!(refreshed.name, "alicia");
    assert_eq!(refreshed.discriminator, None);
    assert!(refreshed.bot);
    assert_eq!(refreshed.created_at, stored.created_at);
    Ok(())
}

#[tokio::test]
async fn test_guild_and_channel_names_refresh() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;

    let first = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "a").build()?;
    recorder.on_message(&first).await?;
    let second = message(101, guild_channel(1, 7, "lobby"), user(42, "alice"), "b").build()?;
    recorder.on_message(&second).await?;

    let channel = archive.guild_channel(7).await.ok_or("channel missing")?;
    assert_eq!(channel.name, "lobby");
    assert_eq!(archive.messages(Topology::Guild).await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_private_pair_is_canonical() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;

    // Recipient id above the bot id
    let high = user(900, "high");
    let msg = message(100, private_channel(50, Some(high.clone())), high, "hello").build()?;
    recorder.on_message(&msg).await?;
    let channel = archive.private_channel(50).await.ok_or("channel missing")?;
    assert_eq!((channel.first_user_id, channel.second_user_id), (BOT_ID, 900));

    // Bot speaks first in a channel whose recipient id is below the bot id
    let low = UserSnapshot::new(0, at(1, 0), "low".into(), None, false);
    let msg = message(101, private_channel(51, Some(low)), bot_user(), "ping").build()?;
    recorder.on_message(&msg).await?;
    let channel = archive.private_channel(51).await.ok_or("channel missing")?;
    assert_eq!((channel.first_user_id, channel.second_user_id), (0, BOT_ID));

    assert_eq!(archive.messages(Topology::Private).await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_private_message_without_recipient_is_skipped() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;

    let msg = message(100, private_channel(50, None), bot_user(), "lost").build()?;
    assert_eq!(recorder.on_message(&msg).await?, 0);
    assert!(archive.private_channel(50).await.is_none());
    assert!(archive.messages(Topology::Private).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_delivery_stores_one_row() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;

    let msg = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "hi").build()?;
    recorder.on_message(&msg).await?;
    recorder.on_message(&msg).await?;

    assert_eq!(archive.messages(Topology::Guild).await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_first_rich_embed_is_stored() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;

    let msg = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "look")
        .embeds(vec![
            embed("image", "picture"),
            embed("rich", "second"),
            embed("rich", "third"),
        ])
        .build()?;
    recorder.on_message(&msg).await?;

    let messages = archive.messages(Topology::Guild).await;
    let stored = messages[0].embed.clone().ok_or("embed missing")?;
    assert_eq!(stored["title"], "second");
    Ok(())
}

#[tokio::test]
async fn test_unchanged_edit_writes_nothing() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;
    let before = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "same")
        .embeds(vec![embed("image", "picture")])
        .build()?;
    recorder.on_message(&before).await?;

    let after = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "same")
        .edited_at(Some(at(3, 9)))
        .build()?;
    assert!(!recorder.on_message_edit(&before, &after).await?);
    assert!(archive.edits(Topology::Guild, 100).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_content_edit_appends_history() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;
    let channel = guild_channel(1, 7, "general");
    let before = message(100, channel.clone(), user(42, "alice"), "draft").build()?;
    recorder.on_message(&before).await?;

    let after = message(100, channel.clone(), user(42, "alice"), "final")
        .edited_at(Some(at(3, 9)))
        .build()?;
    assert!(recorder.on_message_edit(&before, &after).await?);

    let edits = archive.edits(Topology::Guild, 100).await;
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].content, "final");
    assert_eq!(edits[0].edited_at, at(3, 9));

    // The original message row is untouched
    assert_eq!(archive.messages(Topology::Guild).await[0].content, "draft");
    Ok(())
}

#[tokio::test]
async fn test_edit_of_unarchived_message_is_kept() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;
    let channel = guild_channel(1, 7, "general");
    let before = message(300, channel.clone(), user(42, "alice"), "old").build()?;
    let after = message(300, channel, user(42, "alice"), "new")
        .edited_at(Some(at(4, 1)))
        .build()?;

    assert!(recorder.on_message_edit(&before, &after).await?);

    let edits = archive.edits(Topology::Guild, 300).await;
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].content, "new");
    assert!(archive.messages(Topology::Guild).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_embed_only_edit_appends_history() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;
    let channel = private_channel(50, Some(user(42, "alice")));
    let before = message(100, channel.clone(), user(42, "alice"), "link").build()?;
    recorder.on_message(&before).await?;

    let after = message(100, channel, user(42, "alice"), "link")
        .embeds(vec![embed("rich", "preview")])
        .build()?;
    assert!(recorder.on_message_edit(&before, &after).await?);

    let edits = archive.edits(Topology::Private, 100).await;
    assert_eq!(edits.len(), 1);
    let stored = edits[0].embed.clone().ok_or("embed missing")?;
    assert_eq!(stored["title"], "preview");
    Ok(())
}

#[tokio::test]
async fn test_deletion_of_unknown_message_is_tolerated() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;

    let outcome = recorder
        .on_message_delete(&MessageRef::new(404, 7, Topology::Guild))
        .await?;
    assert_eq!(outcome, DeletionOutcome::MessageMissing);
    assert!(archive.deletions(Topology::Guild, 404).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_deletion_of_archived_message_is_recorded() -> TestResult {
    let (archive, recorder) = ready_recorder().await?;
    let alice = user(42, "alice");
    let msg = message(100, private_channel(50, Some(alice.clone())), alice, "bye").build()?;
    recorder.on_message(&msg).await?;

    let outcome = recorder
        .on_message_delete(&MessageRef::new(100, 50, Topology::Private))
        .await?;
    assert_eq!(outcome, DeletionOutcome::Recorded);
    assert_eq!(archive.deletions(Topology::Private, 100).await.len(), 1);

    // The same id in the other topology does not exist
    let outcome = recorder
        .on_message_delete(&MessageRef::new(100, 50, Topology::Guild))
        .await?;
    assert_eq!(outcome, DeletionOutcome::MessageMissing);
    Ok(())
}

#[tokio::test]
async fn test_attachments_follow_message() -> TestResult {
    use panopticon_social::AttachmentSnapshot;

    let (archive, recorder) = ready_recorder().await?;
    let msg = message(100, guild_channel(1, 7, "general"), user(42, "alice"), "")
        .attachments(vec![
            AttachmentSnapshot::new(500, 2048, "cat.png".into(), "https://cdn/cat.png".into()),
            AttachmentSnapshot::new(501, 10, "notes.txt".into(), "https://cdn/notes.txt".into()),
        ])
        .build()?;
    recorder.on_message(&msg).await?;
    recorder.on_message(&msg).await?;

    let attachments = archive.attachments(Topology::Guild, 100).await;
    assert_eq!(attachments.len(), 2);
    assert_eq!(attachments[0].size, 2048);
    assert_eq!(attachments[1].filename, "notes.txt");
    Ok(())
}

#[tokio::test]
async fn test_deletion_swallows_only_its_own_constraint() -> TestResult {
    let guild = MessageRef::new(100, 7, Topology::Guild);
    let private = MessageRef::new(100, 50, Topology::Private);

    let recorder = rejecting_recorder(foreign_key("guild_deletions_message_id_fkey"));
    assert_eq!(recorder.on_message_delete(&guild).await?, DeletionOutcome::MessageMissing);

    let recorder = rejecting_recorder(foreign_key("private_deletions_message_id_fkey"));
    assert_eq!(recorder.on_message_delete(&private).await?, DeletionOutcome::MessageMissing);
    Ok(())
}

#[tokio::test]
async fn test_deletion_propagates_other_foreign_keys() {
    let guild = MessageRef::new(100, 7, Topology::Guild);

    let recorder = rejecting_recorder(foreign_key("guild_messages_author_id_fkey"));
    let err = recorder
        .on_message_delete(&guild)
        .await
        .expect_err("unrelated constraint must propagate");
    assert!(err.is_foreign_key_violation_on("guild_messages_author_id_fkey"));

    // The private deletion constraint does not excuse a guild deletion
    let recorder = rejecting_recorder(foreign_key("private_deletions_message_id_fkey"));
    assert!(recorder.on_message_delete(&guild).await.is_err());

    let private = MessageRef::new(100, 50, Topology::Private);
    let recorder = rejecting_recorder(foreign_key("guild_deletions_message_id_fkey"));
    assert!(recorder.on_message_delete(&private).await.is_err());

    let recorder = rejecting_recorder(DatabaseErrorKind::ForeignKeyViolation {
        constraint: None,
        message: "unnamed".to_string(),
    });
    assert!(recorder.on_message_delete(&guild).await.is_err());
}

#[tokio::test]
async fn test_deletion_propagates_non_constraint_errors() {
    let guild = MessageRef::new(100, 7, Topology::Guild);

    for kind in [
        DatabaseErrorKind::Query("syntax error".to_string()),
        DatabaseErrorKind::Pool("timed out".to_string()),
        DatabaseErrorKind::TaskJoin("cancelled".to_string()),
    ] {
        let recorder = rejecting_recorder(kind.clone());
        let err = recorder
            .on_message_delete(&guild)
            .await
            .expect_err("error must propagate");
        assert_eq!(err.kind, kind);
    }
}

#[tokio::test]
async fn test_edit_errors_propagate() -> TestResult {
    let recorder = rejecting_recorder(DatabaseErrorKind::Query("down".to_string()));
    let channel = guild_channel(1, 7, "general");
    let before = message(100, channel.clone(), user(42, "alice"), "a").build()?;
    let after = message(100, channel, user(42, "alice"), "b").build()?;

    assert!(recorder.on_message_edit(&before, &after).await.is_err());
    Ok(())
}
