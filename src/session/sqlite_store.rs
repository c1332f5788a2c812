use super::store::{SessionStore, StoreResult};
use super::types::Session;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

/// SQLite-backed session store, one row per user holding the JSON record.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Create a new store with an existing pool and ensure the table exists.
    pub async fn new(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS relay_sessions (
                 user_id TEXT PRIMARY KEY,
                 payload TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Open (creating if missing) the database file at `path`.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::new(pool).await
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl SessionStore for SqliteSessionStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn load_all<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = StoreResult<HashMap<String, Session>>> + Send + 'a>> {
        Box::pin(async move {
            let rows = sqlx::query("SELECT user_id, payload FROM relay_sessions")
                .fetch_all(&self.pool)
                .await?;

            let mut sessions = HashMap::with_capacity(rows.len());
            for row in rows {
                let user_id: String = row.try_get("user_id")?;
                let payload: String = row.try_get("payload")?;
                match serde_json::from_str::<Session>(&payload) {
                    Ok(session) => {
                        sessions.insert(session.user_id.clone(), session);
                    }
                    Err(error) => {
                        tracing::warn!(user_id = %user_id, "skipping unreadable session row: {error}");
                    }
                }
            }
            Ok(sessions)
        })
    }

    fn save<'a>(
        &'a self,
        session: &'a Session,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let payload = serde_json::to_string(session)?;
            sqlx::query(
                "INSERT INTO relay_sessions (user_id, payload, updated_at)
                 VALUES ($1, $2, $3)
                 ON CONFLICT(user_id) DO UPDATE SET
                     payload = excluded.payload,
                     updated_at = excluded.updated_at",
            )
            .bind(&session.user_id)
            .bind(payload)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            sqlx::query("DELETE FROM relay_sessions WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(())
        })
    }
}
