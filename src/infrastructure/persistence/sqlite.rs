use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::SessionStore;
use sqlx::{
    any::{AnyConnectOptions, AnyPoolOptions},
    AnyPool, ConnectOptions, Row,
};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use log::LevelFilter;

/// Session store backed by a SQL database (one row per session value).
#[derive(Clone)]
pub struct SqlSessionStore {
    pool: AnyPool,
}

impl SqlSessionStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        // Ensure drivers are installed for AnyPool
        sqlx::any::install_default_drivers();

        let connect_options = AnyConnectOptions::from_str(database_url)?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, std::time::Duration::from_secs(1));

        // An in-memory SQLite database exists per connection
        let max_connections = if database_url.contains(":memory:") { 1 } else { 10 };

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;

        if database_url.starts_with("sqlite") {
            sqlx::query("PRAGMA busy_timeout = 5000")
                .execute(&pool)
                .await?;
        }

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS session_data (
                session_key TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (session_key, key)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_session_data_updated_at ON session_data(updated_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn format_timestamp(at: time::OffsetDateTime) -> DomainResult<String> {
    at.format(&Rfc3339)
        .map_err(|e| DomainError::Internal(format!("Failed to format timestamp: {}", e)))
}

fn now() -> DomainResult<String> {
    format_timestamp(time::OffsetDateTime::now_utc())
}

#[async_trait::async_trait]
impl SessionStore for SqlSessionStore {
    async fn get(&self, session_key: &str, key: &str) -> DomainResult<Option<String>> {
        let row = sqlx::query("SELECT value FROM session_data WHERE session_key = ? AND key = ?")
            .bind(session_key)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn set(&self, session_key: &str, key: &str, value: &str) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO session_data (session_key, key, value, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(session_key, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
        )
        .bind(session_key)
        .bind(key)
        .bind(value)
        .bind(now()?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, session_key: &str, key: &str) -> DomainResult<()> {
        sqlx::query("DELETE FROM session_data WHERE session_key = ? AND key = ?")
            .bind(session_key)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn flush(&self, session_key: &str) -> DomainResult<()> {
        sqlx::query("DELETE FROM session_data WHERE session_key = ?")
            .bind(session_key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM session_data WHERE session_key = ?")
            .bind(to)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE session_data SET session_key = ? WHERE session_key = ?")
            .bind(to)
            .bind(from)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn cleanup_expired_sessions(&self, max_age: time::Duration) -> DomainResult<u64> {
        let cutoff = format_timestamp(time::OffsetDateTime::now_utc() - max_age)?;

        let result = sqlx::query(
            "DELETE FROM session_data WHERE session_key IN (
                SELECT session_key FROM session_data
                GROUP BY session_key
                HAVING MAX(updated_at) < ?
            )",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> SqlSessionStore {
        let store = SqlSessionStore::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to test database");
        store
            .run_migrations()
            .await
            .expect("Failed to create session table");
        store
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let store = setup_store().await;
        store.set("s", "oidc_state", "first").await.unwrap();
        store.set("s", "oidc_state", "second").await.unwrap();

        assert_eq!(
            store.get("s", "oidc_state").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_and_flush() {
        let store = setup_store().await;
        store.set("s", "oidc_nonce", "n").await.unwrap();
        store.set("s", "oidc_state", "st").await.unwrap();

        store.delete("s", "oidc_nonce").await.unwrap();
        assert_eq!(store.get("s", "oidc_nonce").await.unwrap(), None);
        assert!(store.get("s", "oidc_state").await.unwrap().is_some());

        store.flush("s").await.unwrap();
        assert_eq!(store.get("s", "oidc_state").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rename_moves_values() {
        let store = setup_store().await;
        store.set("old", "k", "v").await.unwrap();

        store.rename("old", "new").await.unwrap();

        assert_eq!(store.get("old", "k").await.unwrap(), None);
        assert_eq!(store.get("new", "k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_cleanup_keeps_recent_sessions() {
        let store = setup_store().await;
        store.set("s", "k", "v").await.unwrap();

        let removed = store
            .cleanup_expired_sessions(time::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(removed, 0);
        assert!(store.get("s", "k").await.unwrap().is_some());
    }
}
