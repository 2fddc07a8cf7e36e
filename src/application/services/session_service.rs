use crate::domain::entities::Principal;
use crate::domain::errors::DomainResult;
use crate::domain::ports::{Session, SessionLifecycle, TokenGenerator};
use std::sync::Arc;

/// Session key holding the logged-in principal as JSON.
pub const SESSION_PRINCIPAL_KEY: &str = "_auth_principal";

pub const SESSION_KEY_SIZE: usize = 32;

/// Session-backed login state.
#[derive(Clone)]
pub struct SessionService {
    tokens: Arc<dyn TokenGenerator>,
}

impl SessionService {
    pub fn new(tokens: Arc<dyn TokenGenerator>) -> Self {
        Self { tokens }
    }

    /// Fresh key for a user-agent that presented no session cookie.
    pub fn new_session_key(&self) -> String {
        self.tokens.generate(SESSION_KEY_SIZE)
    }
}

#[async_trait::async_trait]
impl SessionLifecycle for SessionService {
    async fn login(&self, session: &mut Session, principal: &Principal) -> DomainResult<()> {
        // New key on login so a key planted before authentication is useless afterwards
        session.cycle_key(self.new_session_key()).await?;
        let value = serde_json::to_string(principal)?;
        session.set(SESSION_PRINCIPAL_KEY, &value).await
    }

    async fn logout(&self, session: &mut Session) -> DomainResult<()> {
        session.flush().await
    }

    async fn current(&self, session: &Session) -> DomainResult<Option<Principal>> {
        match session.get(SESSION_PRINCIPAL_KEY).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }
}
