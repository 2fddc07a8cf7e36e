use crate::config::ProviderSettings;
use crate::domain::entities::Principal;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{AuthenticationBackend, AuthenticationRequest};
use openidconnect::{
    core::{CoreClient, CoreIdTokenClaims, CoreProviderMetadata},
    reqwest::async_http_client,
    AuthorizationCode, ClientId, ClientSecret, IssuerUrl, Nonce, RedirectUrl, TokenResponse,
};

/// Exchanges authorization codes at the identity provider's token endpoint
/// and verifies the returned ID token.
#[derive(Clone)]
pub struct OpenIdConnectBackend {
    client: CoreClient,
    use_nonce: bool,
}

/// How the `nonce` claim of the returned ID token is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NonceCheck {
    /// The claim must equal the value remembered in the session.
    Verify(String),
    /// No value was remembered, so the token must not carry one either.
    Absent,
    /// Nonce binding is switched off.
    Skip,
}

impl NonceCheck {
    fn for_request(use_nonce: bool, nonce: Option<String>) -> Self {
        match (use_nonce, nonce) {
            (false, _) => NonceCheck::Skip,
            (true, Some(nonce)) if !nonce.is_empty() => NonceCheck::Verify(nonce),
            (true, _) => NonceCheck::Absent,
        }
    }
}

fn reject_unexpected_nonce(claim: Option<&Nonce>) -> Result<(), String> {
    match claim {
        Some(_) => Err("ID token carries a nonce but none is bound to this session".to_string()),
        None => Ok(()),
    }
}

impl OpenIdConnectBackend {
    /// Discover provider metadata once and build the client.
    pub async fn discover(
        provider: &ProviderSettings,
        client_id: &str,
        redirect_uri: &str,
        use_nonce: bool,
    ) -> DomainResult<Self> {
        let issuer_url = IssuerUrl::new(provider.issuer_url.clone())
            .map_err(|e| DomainError::Internal(format!("Invalid issuer URL: {}", e)))?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, async_http_client)
            .await
            .map_err(|e| {
                DomainError::Backend(format!("Failed to discover provider metadata: {}", e))
            })?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(client_id.to_string()),
            Some(ClientSecret::new(provider.client_secret.clone())),
        )
        .set_redirect_uri(
            RedirectUrl::new(redirect_uri.to_string())
                .map_err(|e| DomainError::Internal(format!("Invalid redirect URI: {}", e)))?,
        );

        Ok(Self { client, use_nonce })
    }

    fn principal_from_claims(claims: &CoreIdTokenClaims) -> Principal {
        Principal::new(
            claims.subject().as_str(),
            claims.email().map(|email| email.as_str().to_string()),
        )
    }
}

#[async_trait::async_trait]
impl AuthenticationBackend for OpenIdConnectBackend {
    async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> DomainResult<Option<Principal>> {
        let nonce_check = NonceCheck::for_request(self.use_nonce, request.nonce);

        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(request.code))
            .request_async(async_http_client)
            .await
            .map_err(|e| {
                DomainError::Backend(format!("Failed to exchange authorization code: {}", e))
            })?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| DomainError::Backend("No ID token in response".to_string()))?;

        let verifier = self.client.id_token_verifier();
        let claims = match nonce_check {
            NonceCheck::Verify(nonce) => id_token.claims(&verifier, &Nonce::new(nonce)),
            NonceCheck::Absent => id_token.claims(&verifier, reject_unexpected_nonce),
            NonceCheck::Skip => {
                id_token.claims(&verifier, |_: Option<&Nonce>| -> Result<(), String> { Ok(()) })
            }
        }
        .map_err(|e| DomainError::Backend(format!("Failed to verify ID token: {}", e)))?;

        Ok(Some(Self::principal_from_claims(claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_nonce_is_verified_when_enabled() {
        assert_eq!(
            NonceCheck::for_request(true, Some("n-1".to_string())),
            NonceCheck::Verify("n-1".to_string())
        );
    }

    #[test]
    fn test_missing_session_nonce_is_not_skipped_when_enabled() {
        assert_eq!(NonceCheck::for_request(true, None), NonceCheck::Absent);
        assert_eq!(
            NonceCheck::for_request(true, Some(String::new())),
            NonceCheck::Absent
        );
    }

    #[test]
    fn test_nonce_check_skipped_only_when_disabled() {
        assert_eq!(NonceCheck::for_request(false, None), NonceCheck::Skip);
        assert_eq!(
            NonceCheck::for_request(false, Some("n-1".to_string())),
            NonceCheck::Skip
        );
    }

    #[test]
    fn test_token_nonce_rejected_without_session_nonce() {
        let claim = Nonce::new("replayed".to_string());

        assert!(reject_unexpected_nonce(Some(&claim)).is_err());
        assert!(reject_unexpected_nonce(None).is_ok());
    }
}
