//! Database error types.

/// Database error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Connection failed
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// Could not check a connection out of the pool
    #[display("Connection pool error: {}", _0)]
    Pool(String),
    /// Query execution failed
    #[display("Database query error: {}", _0)]
    Query(String),
    /// A row referenced a parent that does not exist
    #[display("Foreign key violation on {}: {}", constraint.as_deref().unwrap_or("<unnamed>"), message)]
    ForeignKeyViolation {
        /// Name of the violated constraint, when the server reports one
        constraint: Option<String>,
        /// Server message
        message: String,
    },
    /// A unique or primary key constraint was violated
    #[display("Unique violation: {}", _0)]
    UniqueViolation(String),
    /// Serialization/deserialization error
    #[display("Serialization error: {}", _0)]
    Serialization(String),
    /// Migration error
    #[display("Migration error: {}", _0)]
    Migration(String),
    /// Record not found
    #[display("Record not found")]
    NotFound,
    /// The blocking task running the query panicked or was cancelled
    #[display("Database task failed: {}", _0)]
    TaskJoin(String),
}

/// Database error with source location tracking.
///
/// # Examples
///
/// ```
/// use panopticon_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::NotFound);
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The kind of error that occurred
    pub kind: DatabaseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Returns true when this is a foreign key violation on `constraint`.
    ///
    /// # Examples
    ///
    /// ```
    /// use panopticon_error::{DatabaseError, DatabaseErrorKind};
    ///
    /// let err = DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation {
    ///     constraint: Some("guild_deletions_message_id_fkey".to_string()),
    ///     message: "insert or update violates foreign key".to_string(),
    /// });
    /// assert!(err.is_foreign_key_violation_on("guild_deletions_message_id_fkey"));
    /// assert!(!err.is_foreign_key_violation_on("guild_messages_author_id_fkey"));
    /// ```
    pub fn is_foreign_key_violation_on(&self, constraint: &str) -> bool {
        matches!(
            &self.kind,
            DatabaseErrorKind::ForeignKeyViolation { constraint: Some(name), .. } if name == constraint
        )
    }
}

impl From<diesel::result::Error> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind as DieselKind, Error};

        match err {
            Error::NotFound => DatabaseError::new(DatabaseErrorKind::NotFound),
            Error::DatabaseError(DieselKind::ForeignKeyViolation, info) => {
                DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation {
                    constraint: info.constraint_name().map(str::to_string),
                    message: info.message().to_string(),
                })
            }
            Error::DatabaseError(DieselKind::UniqueViolation, info) => {
                DatabaseError::new(DatabaseErrorKind::UniqueViolation(info.message().to_string()))
            }
            _ => DatabaseError::new(DatabaseErrorKind::Query(err.to_string())),
        }
    }
}

impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}

impl From<diesel::r2d2::PoolError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::r2d2::PoolError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Pool(err.to_string()))
    }
}

impl From<serde_json::Error> for DatabaseError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::new(DatabaseErrorKind::Serialization(err.to_string()))
    }
}
