//! Error types for Panopticon.
//!
//! This crate provides the foundation error types used throughout the Panopticon workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use panopticon_error::{ConfigError, PanopticonResult};
//!
//! fn load_token() -> PanopticonResult<String> {
//!     Err(ConfigError::new("discord.token is not set"))?
//! }
//!
//! assert!(load_token().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{PanopticonError, PanopticonErrorKind, PanopticonResult};
