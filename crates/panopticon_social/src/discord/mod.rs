//! Discord archive integration.
//!
//! This module turns Discord gateway events into durable PostgreSQL rows.
//!
//! # Architecture
//!
//! ## Data Layer
//! - **models**: Diesel models for archived entities (users, guilds, channels, messages, ...)
//! - **repository**: PostgreSQL [`RecordSink`] running each batch in one transaction
//! - **memory**: In-memory sink with the same conflict policies, for tests
//!
//! ## Mapping Layer
//! - **snapshots**: Platform-neutral views of gateway payloads
//! - **mapper**: Pure functions from snapshots to ordered [`RecordOp`] lists
//! - **recorder**: One operation per subscribed event
//!
//! ## Integration Layer (`discord` feature)
//! - **client**: Serenity client setup and lifecycle management
//! - **handler**: Event handler implementing Serenity's EventHandler trait
//! - **conversions**: Serenity models to snapshots

#[cfg(feature = "discord")]
mod client;
mod conversions;
mod error;
#[cfg(feature = "discord")]
mod handler;
mod mapper;
mod memory;
mod models;
mod recipients;
mod recorder;
mod records;
mod repository;
mod session;
mod sink;
mod snapshots;

#[cfg(feature = "discord")]
pub use client::PanopticonBot;
#[cfg(feature = "discord")]
pub use conversions::{
    attachment_snapshot, embed_snapshot, message_snapshot, naive_timestamp, user_snapshot,
};
pub use conversions::{DISCORD_EPOCH_MS, snowflake_timestamp};
pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
#[cfg(feature = "discord")]
pub use handler::PanopticonHandler;
pub use mapper::{
    RICH_EMBED_KIND, extract_rich_embed, map_deletion, map_edit, map_guild, map_guild_channel,
    map_message, map_private_channel, map_user,
};
pub use memory::InMemoryArchive;
pub use models::{
    AttachmentRow, DeletionRow, EditRow, GuildChannelRow, GuildRow, MessageRow, NewAttachment,
    NewDeletion, NewEdit, NewGuild, NewGuildChannel, NewMessage, NewPrivateChannel, NewUser,
    PrivateChannelRow, Topology, UserRow,
};
pub use recipients::RecipientCache;
pub use recorder::{DeletionOutcome, EventRecorder};
pub use records::RecordOp;
pub use repository::ArchiveRepository;
pub use session::SessionState;
pub use sink::{ArchiveResult, RecordSink};
pub use snapshots::{
    AttachmentSnapshot, AttachmentSnapshotBuilder, ChannelSnapshot, EmbedSnapshot,
    EmbedSnapshotBuilder, GuildChannelSnapshot, GuildChannelSnapshotBuilder, GuildSnapshot,
    GuildSnapshotBuilder, MessageRef, MessageSnapshot, MessageSnapshotBuilder,
    PrivateChannelSnapshot, PrivateChannelSnapshotBuilder, UserSnapshot, UserSnapshotBuilder,
};
