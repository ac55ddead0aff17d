//! Destination for mapped archive writes.

use async_trait::async_trait;
use panopticon_error::DatabaseError;

use super::records::RecordOp;

/// Result type for archive writes.
pub type ArchiveResult<T> = Result<T, DatabaseError>;

/// Applies batches of [`RecordOp`]s atomically.
///
/// Implementations must run a whole batch in one transaction: either every
/// operation takes effect or none does.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Apply `ops` in order inside one transaction.
    ///
    /// Returns the number of rows actually written; conflicts resolved with
    /// `DO NOTHING` count as zero.
    async fn apply(&self, ops: Vec<RecordOp>) -> ArchiveResult<usize>;
}
