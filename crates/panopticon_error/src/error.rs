//! Top-level error wrapper types.

use crate::ConfigError;
#[cfg(feature = "database")]
use crate::DatabaseError;

/// Every error the Panopticon crates surface to the binary.
///
/// # Examples
///
/// ```
/// use panopticon_error::{ConfigError, PanopticonError};
///
/// let err: PanopticonError = ConfigError::new("bad token").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PanopticonErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Gateway or Discord API error, already rendered by the integration crate
    #[display("Gateway Error: {}", _0)]
    #[from(ignore)]
    Gateway(#[error(not(source))] String),
}

/// Panopticon error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Panopticon Error: {}", _0)]
pub struct PanopticonError(Box<PanopticonErrorKind>);

impl PanopticonError {
    /// Create a new error from a kind.
    pub fn new(kind: PanopticonErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Create a gateway error from any displayable message.
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::new(PanopticonErrorKind::Gateway(message.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PanopticonErrorKind {
        &self.0
    }
}

impl<T> From<T> for PanopticonError
where
    T: Into<PanopticonErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Panopticon operations.
pub type PanopticonResult<T> = std::result::Result<T, PanopticonError>;
