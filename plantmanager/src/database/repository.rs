//! SQLite-backed key/value store
//!
//! One table, `key_value_store`, holds every stored value. Its layout is
//! tracked with SQLite's `user_version` pragma.

use crate::error::Result;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// `user_version` written once the table exists
const SCHEMA_VERSION: i32 = 1;

const CREATE_STORE: &str = include_str!("key_value_store.sql");

/// Key/value repository over a SQLite pool
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Open (creating if needed) the database file at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        tracing::info!("Opening plant database at: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a stored value
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM key_value_store WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Insert or replace a stored value
    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO key_value_store (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set value for key {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Delete a stored value
    pub async fn delete_value(&self, key: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM key_value_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Deleted key {} ({} rows)", key, rows);
        Ok(())
    }
}

/// Create the store table on a fresh database
async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    let version: i32 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    if version >= SCHEMA_VERSION {
        tracing::debug!("Database schema at version {}", version);
        return Ok(());
    }

    tracing::info!("Creating key/value store (schema {} -> {})", version, SCHEMA_VERSION);

    let mut tx = pool.begin().await?;
    sqlx::query(CREATE_STORE).execute(&mut *tx).await?;
    // PRAGMA values cannot be bound
    let bump = format!("PRAGMA user_version = {}", SCHEMA_VERSION);
    sqlx::query(&bump).execute(&mut *tx).await?;
    tx.commit().await?;

    Ok(())
}

#[async_trait]
impl KeyValueStore for Repository {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.delete_value(key).await
    }
}
