use crate::domain::errors::DomainResult;
use crate::domain::ports::SessionStore;
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;

struct SessionEntry {
    data: HashMap<String, String>,
    updated_at: OffsetDateTime,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            data: HashMap::new(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Process-local session store. Idle sessions are dropped by
/// `cleanup_expired_sessions`.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn remove_idle_since(&self, cutoff: OffsetDateTime) -> u64 {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.updated_at >= cutoff);
        (before - sessions.len()) as u64
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_key: &str, key: &str) -> DomainResult<Option<String>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_key)
            .and_then(|entry| entry.data.get(key))
            .cloned())
    }

    async fn set(&self, session_key: &str, key: &str, value: &str) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(session_key.to_string())
            .or_insert_with(SessionEntry::new);
        entry.data.insert(key.to_string(), value.to_string());
        entry.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn delete(&self, session_key: &str, key: &str) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(session_key) {
            entry.data.remove(key);
            if entry.data.is_empty() {
                sessions.remove(session_key);
            }
        }
        Ok(())
    }

    async fn flush(&self, session_key: &str) -> DomainResult<()> {
        self.sessions.write().await.remove(session_key);
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(from) {
            Some(mut entry) => {
                entry.updated_at = OffsetDateTime::now_utc();
                sessions.insert(to.to_string(), entry);
            }
            None => {
                sessions.remove(to);
            }
        }
        Ok(())
    }

    async fn cleanup_expired_sessions(&self, max_age: time::Duration) -> DomainResult<u64> {
        Ok(self
            .remove_idle_since(OffsetDateTime::now_utc() - max_age)
            .await)
    }
}
