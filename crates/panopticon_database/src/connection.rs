//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use panopticon_error::{DatabaseError, DatabaseErrorKind};
use tracing::{info, instrument};

/// Pool of PostgreSQL connections shared by every event handler.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Build a connection pool for `dsn`.
///
/// The pool eagerly opens one connection so a bad DSN fails at startup
/// rather than on the first gateway event.
///
/// # Errors
///
/// Returns an error if no connection to the database can be established.
#[instrument(skip(dsn))]
pub fn establish_pool(dsn: &str, max_size: u32) -> DatabaseResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(dsn);
    let pool = Pool::builder()
        .max_size(max_size)
        .min_idle(Some(1))
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

    info!(max_size, "Database pool ready");
    Ok(pool)
}

/// Run pending migrations.
#[instrument(skip(conn))]
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;

    info!(count = applied.len(), "Applied pending migrations");
    Ok(())
}

/// Run pending migrations on a connection checked out of `pool`.
///
/// # Errors
///
/// Returns an error if no connection is available or a migration fails.
pub fn migrate_pool(pool: &PgPool) -> DatabaseResult<()> {
    let mut conn = pool.get()?;
    run_migrations(&mut conn)
}
