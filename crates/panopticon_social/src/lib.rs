//! Discord event archive for Panopticon.
//!
//! Records what happens on a Discord bot's gateway session (messages, edits
//! and deletions in guild text channels and direct messages) into PostgreSQL.
//!
//! # Layers
//!
//! - Snapshots: platform-neutral views of gateway payloads
//! - Mapper: pure translation of snapshots into ordered [`RecordOp`] lists
//! - Sinks: [`ArchiveRepository`] for PostgreSQL, [`InMemoryArchive`] for tests
//! - Recorder: [`EventRecorder`], one operation per subscribed event
//! - Gateway glue: [`PanopticonHandler`] and [`PanopticonBot`] (requires the `discord` feature)
//!
//! # Example
//!
//! ```
//! use panopticon_social::{
//!     ChannelSnapshot, EventRecorder, GuildChannelSnapshot, GuildSnapshot, InMemoryArchive,
//!     MessageSnapshot, SessionState, Topology, UserSnapshot,
//! };
//! use chrono::NaiveDateTime;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = Arc::new(InMemoryArchive::new());
//! let recorder = EventRecorder::new(archive.clone(), Arc::new(SessionState::new()));
//!
//! let when = NaiveDateTime::default();
//! recorder.on_ready(&UserSnapshot::new(1, when, "panopticon".into(), None, true)).await?;
//!
//! let channel = ChannelSnapshot::Guild(GuildChannelSnapshot::new(
//!     7,
//!     GuildSnapshot::new(1, "guild".into()),
//!     "general".into(),
//! ));
//! let author = UserSnapshot::new(42, when, "alice".into(), None, false);
//! let message = MessageSnapshot::new(100, when, None, channel, author, "hi".into(), vec![], vec![]);
//!
//! recorder.on_message(&message).await?;
//! assert_eq!(archive.messages(Topology::Guild).await.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod discord;

pub use discord::*;
