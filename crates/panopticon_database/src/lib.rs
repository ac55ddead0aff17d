//! PostgreSQL integration for Panopticon.
//!
//! This crate owns the relational layout of the archive: the diesel schema for
//! the twelve archive tables, the embedded SQL migrations that create them, and
//! the r2d2 connection pool every event handler draws from.
//!
//! # Example
//!
//! ```rust,ignore
//! use panopticon_database::{establish_pool, migrate_pool};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = establish_pool("postgres://localhost/panopticon", 10)?;
//! migrate_pool(&pool)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;

#[allow(missing_docs)]
pub mod schema;

pub use connection::{PgPool, establish_pool, migrate_pool, run_migrations};

use panopticon_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Foreign key guarding `private_deletions.message_id`.
pub const PRIVATE_DELETION_MESSAGE_FK: &str = "private_deletions_message_id_fkey";

/// Foreign key guarding `guild_deletions.message_id`.
pub const GUILD_DELETION_MESSAGE_FK: &str = "guild_deletions_message_id_fkey";
