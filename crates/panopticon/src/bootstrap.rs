//! Process startup and shutdown.
//!
//! Startup order: tracing, configuration, database pool (and migrations),
//! gateway client. Ctrl-C stops every shard; the pool is closed once the
//! gateway has stopped.

use crate::PanopticonConfig;
use panopticon_database::{PgPool, establish_pool, migrate_pool};
use panopticon_error::{DatabaseError, DatabaseErrorKind, PanopticonError, PanopticonResult};
use panopticon_social::{
    ArchiveRepository, EventRecorder, PanopticonBot, RecipientCache, SessionState,
};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// How long in-flight event handlers get to finish after the shards stop.
pub const HANDLER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Build the connection pool and, if configured, apply pending migrations.
///
/// Runs on the blocking thread pool; r2d2 opens connections synchronously.
#[instrument(skip(config))]
pub async fn prepare_database(config: &PanopticonConfig) -> PanopticonResult<PgPool> {
    let dsn = config.database().dsn().clone();
    let max_connections = *config.database().max_connections();
    let migrate = *config.database().run_migrations();

    let pool = tokio::task::spawn_blocking(move || -> Result<PgPool, DatabaseError> {
        let pool = establish_pool(&dsn, max_connections)?;
        if migrate {
            migrate_pool(&pool)?;
        }
        Ok(pool)
    })
    .await
    .map_err(|e| DatabaseError::new(DatabaseErrorKind::TaskJoin(e.to_string())))??;

    Ok(pool)
}

/// Run the archive until the gateway stops or Ctrl-C is received.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// gateway client cannot be built or started.
#[instrument(skip_all)]
pub async fn run(config: PanopticonConfig) -> PanopticonResult<()> {
    let pool = prepare_database(&config).await?;

    let session = Arc::new(SessionState::new());
    let repository = ArchiveRepository::new(pool.clone());
    let recorder = Arc::new(EventRecorder::new(Arc::new(repository), session));
    let recorder_handle = Arc::downgrade(&recorder);
    let recipients = Arc::new(RecipientCache::new(*config.cache().private_channels()));

    let mut bot = PanopticonBot::new(
        config.discord().token(),
        *config.discord().max_messages(),
        recorder,
        recipients,
    )
    .await
    .map_err(|e| PanopticonError::gateway(e.to_string()))?;

    let shard_manager = bot.shard_manager();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested, stopping shards");
                shard_manager.shutdown_all().await;
            }
            Err(e) => error!(error = %e, "Could not listen for Ctrl-C"),
        }
    });

    let result = bot
        .start()
        .await
        .map_err(|e| PanopticonError::gateway(e.to_string()));

    // Event tasks spawned by serenity may still hold the recorder, and with it
    // clones of the pool.
    drop(bot);
    if wait_for_release(&recorder_handle, HANDLER_DRAIN_TIMEOUT).await {
        drop(pool);
        info!("Event handlers finished, database pool closed");
    } else {
        drop(pool);
        warn!(
            timeout_secs = HANDLER_DRAIN_TIMEOUT.as_secs(),
            "Event handlers still running; pool closes when they finish"
        );
    }

    result
}

/// Wait until every strong reference behind `handle` is gone.
///
/// Returns `false` if references remain after `timeout`.
pub async fn wait_for_release<T>(handle: &Weak<T>, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while handle.strong_count() > 0 {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
    true
}
