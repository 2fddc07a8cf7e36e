use crate::domain::entities::Principal;
use crate::domain::errors::DomainResult;
use crate::domain::ports::session_store::Session;

#[async_trait::async_trait]
pub trait SessionLifecycle: Send + Sync {
    /// Mark the session as authenticated for `principal`. May re-key the session.
    async fn login(&self, session: &mut Session, principal: &Principal) -> DomainResult<()>;
    async fn logout(&self, session: &mut Session) -> DomainResult<()>;
    async fn current(&self, session: &Session) -> DomainResult<Option<Principal>>;
}
