//! Panopticon - Discord event archive
//!
//! Panopticon connects to the Discord gateway as a bot and records what it
//! sees into PostgreSQL: users, guilds, channels, messages with their
//! attachments and rich embeds, plus an append-only history of edits and
//! deletions.
//!
//! # Architecture
//!
//! Panopticon is organized as a workspace with focused crates:
//!
//! - `panopticon-error` - Error types
//! - `panopticon-database` - Schema, migrations and connection pool
//! - `panopticon-social` - Event snapshots, record mapping, sinks and the serenity handler
//!
//! This crate wires them together: configuration, tracing and the process
//! lifecycle.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use panopticon::{PanopticonConfig, init_tracing, run};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_tracing();
//!     let config = PanopticonConfig::load()?;
//!     run(config).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod bootstrap;
mod config;

pub use bootstrap::{
    DEFAULT_LOG_FILTER, HANDLER_DRAIN_TIMEOUT, init_tracing, prepare_database, run,
    wait_for_release,
};
pub use config::{
    CONFIG_PATH_VAR, CacheConfig, DEFAULT_CONFIG_PATH, DatabaseConfig, DiscordConfig,
    ENV_PREFIX, ENV_SEPARATOR, PanopticonConfig, environment,
};

// Re-export the workspace crates
pub use panopticon_database as database;
pub use panopticon_error as error;
pub use panopticon_social as social;
