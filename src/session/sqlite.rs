//! SQLite-backed session store.
//!
//! The durable backend for production deployments. The schema is a single
//! `sessions` table keyed by id; `created_at` is stored as RFC 3339 text and
//! `lifetime` as integer milliseconds.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use async_trait::async_trait;

use crate::error::StoreError;

use super::store::{Session, SessionStore};
use super::DEFAULT_SESSION_LIFETIME_MS;

/// SQLite implementation of [`SessionStore`] on a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Connect to the given sqlx SQLite URL (e.g. `sqlite:sessions.db?mode=rwc`).
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY NOT NULL,
                created_at TEXT NOT NULL,
                lifetime INTEGER NOT NULL DEFAULT {DEFAULT_SESSION_LIFETIME_MS}
            )"
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, created_at, lifetime FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn set(&self, session: Session) -> Result<Session, StoreError> {
        let stored = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, created_at, lifetime)
             VALUES (?, ?, ?)
             RETURNING id, created_at, lifetime",
        )
        .bind(&session.id)
        .bind(&session.created_at)
        .bind(session.lifetime)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                StoreError::DuplicateId(session.id.clone())
            } else {
                StoreError::from(e)
            }
        })?;

        Ok(stored)
    }

    async fn del(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
