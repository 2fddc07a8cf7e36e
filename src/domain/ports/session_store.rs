use crate::domain::errors::DomainResult;
use std::sync::Arc;

/// Key/value storage scoped to one user-agent session.
///
/// Expiry of stored data is the store's concern, handlers only read and write.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_key: &str, key: &str) -> DomainResult<Option<String>>;
    async fn set(&self, session_key: &str, key: &str, value: &str) -> DomainResult<()>;
    async fn delete(&self, session_key: &str, key: &str) -> DomainResult<()>;
    /// Remove every value held for the session.
    async fn flush(&self, session_key: &str) -> DomainResult<()>;
    /// Move all values of `from` under `to`, leaving `from` empty.
    async fn rename(&self, from: &str, to: &str) -> DomainResult<()>;
    /// Drop sessions not written to for longer than `max_age`. Returns the
    /// number of removed entries.
    async fn cleanup_expired_sessions(&self, max_age: time::Duration) -> DomainResult<u64>;
}

/// A session store bound to the key carried by the current request.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    key: String,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.store.get(&self.key, key).await
    }

    pub async fn contains(&self, key: &str) -> DomainResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    pub async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.store.set(&self.key, key, value).await
    }

    pub async fn delete(&self, key: &str) -> DomainResult<()> {
        self.store.delete(&self.key, key).await
    }

    /// Read a value and remove it before returning.
    pub async fn take(&self, key: &str) -> DomainResult<Option<String>> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.delete(key).await?;
        }
        Ok(value)
    }

    pub async fn flush(&self) -> DomainResult<()> {
        self.store.flush(&self.key).await
    }

    /// Re-key the session, keeping its data.
    pub async fn cycle_key(&mut self, new_key: String) -> DomainResult<()> {
        self.store.rename(&self.key, &new_key).await?;
        self.key = new_key;
        Ok(())
    }
}
