//! Migration tests
//!
//! These need a live database: set `DATABASE_URL` and run with
//! `cargo test -p panopticon_database -- --ignored`.

use panopticon_database::{establish_pool, migrate_pool};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
#[ignore]
fn test_migrate_pool_is_idempotent() -> TestResult {
    dotenvy::dotenv().ok();
    let dsn = std::env::var("DATABASE_URL")?;
    let pool = establish_pool(&dsn, 2)?;

    migrate_pool(&pool)?;
    // Second run finds nothing pending
    migrate_pool(&pool)?;
    Ok(())
}

