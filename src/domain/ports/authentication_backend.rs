use crate::domain::entities::Principal;
use crate::domain::errors::DomainResult;

/// Credentials handed to the backend once the callback has passed the
/// anti-forgery checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationRequest {
    pub code: String,
    pub state: String,
    pub nonce: Option<String>,
}

/// Exchanges an authorization code with the identity provider and resolves
/// the resulting identity to a local principal.
#[async_trait::async_trait]
pub trait AuthenticationBackend: Send + Sync {
    /// `Ok(None)` when the code is valid but maps to no local principal.
    async fn authenticate(&self, request: AuthenticationRequest)
        -> DomainResult<Option<Principal>>;
}
