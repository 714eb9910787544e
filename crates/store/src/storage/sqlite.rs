//! SQLite key/value table.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use super::SnapshotStorage;

/// SQLite-backed storage (one row per key).
///
/// The pool is opened lazily on first use, inside whatever runtime drives the
/// storage (normally the persistence worker's).
#[derive(Debug)]
pub struct SqliteStorage {
    target: Target,
    pool: Mutex<Option<SqlitePool>>,
}

#[derive(Debug, Clone)]
enum Target {
    File(PathBuf),
    Url(String),
}

impl SqliteStorage {
    /// Database file at `path`; created (with parent directories) if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::File(path.into()),
            pool: Mutex::new(None),
        }
    }

    /// Database from a connection URL (e.g. `sqlite::memory:`).
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            target: Target::Url(url.into()),
            pool: Mutex::new(None),
        }
    }

    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let options = match &self.target {
            Target::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create database directory at {:?}", parent))?;
                }
                SqliteConnectOptions::new().filename(path).create_if_missing(true)
            }
            Target::Url(url) => SqliteConnectOptions::from_str(url)
                .with_context(|| format!("invalid SQLite connection URL {url:?}"))?,
        };

        // One connection: a `:memory:` database only exists per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite storage at {:?}", self.target))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_store table")?;

        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl SnapshotStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let pool = self.get_pool().await?;

        let row = sqlx::query(
            r#"
            SELECT value
            FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&pool)
        .await
        .context("failed to fetch snapshot from SQLite storage")?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&pool)
        .await
        .context("failed to upsert snapshot in SQLite storage")?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;

        sqlx::query(
            r#"
            DELETE FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&pool)
        .await
        .context("failed to delete snapshot from SQLite storage")?;

        Ok(())
    }

    async fn close(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
        }
    }
}
