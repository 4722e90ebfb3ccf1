//! Database initialization
//!
//! Creates the database on first run and keeps table creation idempotent so
//! every service can open the same file safely. Connection-scoped PRAGMAs
//! (foreign keys, busy timeout) go through the connect options so every
//! pooled connection gets them, not just the first.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        // Foreign keys make split entries cascade on release deletion
        .foreign_keys(true)
        // WAL allows concurrent readers with one writer
        .journal_mode(SqliteJournalMode::Wal)
        // Writers queue on the single write lock instead of failing
        // immediately; the ledger's serialized transactions rely on this
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_tables(&pool).await?;

    Ok(pool)
}

/// In-memory database for tests.
///
/// Pinned to a single connection: each SQLite `:memory:` connection is its
/// own database, so a pool of them would not share tables.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(sqlx::Error::from)?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_releases_table(pool).await?;
    create_royalty_splits_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            guid TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'music_creator',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_releases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS releases (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'draft',
            cover_url TEXT,
            audio_url TEXT,
            metadata TEXT,
            owner_guid TEXT NOT NULL REFERENCES users(guid),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_releases_owner ON releases(owner_guid)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_royalty_splits_table(pool: &SqlitePool) -> Result<()> {
    // share_hundredths holds integer hundredths of a percent; the CHECK is a
    // per-row backstop, the per-release sum bound is enforced by the ledger
    // inside its transaction.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS royalty_splits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            release_guid TEXT NOT NULL REFERENCES releases(guid) ON DELETE CASCADE,
            recipient TEXT NOT NULL,
            share_hundredths INTEGER NOT NULL
                CHECK (share_hundredths > 0 AND share_hundredths <= 10000),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_royalty_splits_release ON royalty_splits(release_guid)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
