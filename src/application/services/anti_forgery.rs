use crate::domain::entities::{
    SessionProtocolState, SESSION_LOGIN_NEXT_KEY, SESSION_NONCE_KEY, SESSION_STATE_KEY,
};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{Session, TokenGenerator};
use std::sync::Arc;

/// Generates and verifies the `state` and `nonce` tokens that bind both legs
/// of the flow to the same user-agent.
#[derive(Clone)]
pub struct AntiForgeryContext {
    tokens: Arc<dyn TokenGenerator>,
}

impl AntiForgeryContext {
    pub fn new(tokens: Arc<dyn TokenGenerator>) -> Self {
        Self { tokens }
    }

    pub fn generate_state(&self, size: usize) -> String {
        self.tokens.generate(size)
    }

    pub fn generate_nonce(&self, size: usize) -> String {
        self.tokens.generate(size)
    }

    /// Exact equality; no stored value never validates.
    pub fn validate_state(received: &str, stored: Option<&str>) -> bool {
        matches!(stored, Some(stored) if stored == received)
    }

    /// Write the values of a new flow attempt into the session. A missing
    /// nonce or login target clears whatever a previous attempt left behind.
    pub async fn seed(&self, session: &Session, state: &SessionProtocolState) -> DomainResult<()> {
        match &state.nonce {
            Some(nonce) => session.set(SESSION_NONCE_KEY, nonce).await?,
            None => session.delete(SESSION_NONCE_KEY).await?,
        }
        session.set(SESSION_STATE_KEY, &state.state).await?;
        match &state.login_next {
            Some(next) => session.set(SESSION_LOGIN_NEXT_KEY, next).await?,
            None => session.delete(SESSION_LOGIN_NEXT_KEY).await?,
        }
        Ok(())
    }

    /// Consume-once read of the nonce. The key is gone from the session
    /// before this returns, whatever the caller does next.
    pub async fn consume_nonce(&self, session: &Session) -> DomainResult<Option<String>> {
        let nonce = session.take(SESSION_NONCE_KEY).await?;
        Ok(nonce.filter(|n| !n.is_empty()))
    }

    pub async fn stored_state(&self, session: &Session) -> DomainResult<Option<String>> {
        session.get(SESSION_STATE_KEY).await
    }
}
