use crate::application::services::authentication_service::establish;
use crate::config::AuthorizationSettings;
use crate::domain::entities::{AuthorizationRequestParams, CallbackOutcome, FailureReason};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{AuthenticationBackend, AuthenticationRequest, Session, SessionLifecycle};
use std::sync::Arc;

/// Simplified authorization endpoints.
///
/// No `state` or `nonce` is generated and the callback never compares the
/// incoming `state` with anything held in the session: whatever validation
/// happens is up to the backend. This is a weaker guarantee than
/// [`AuthenticationService`](super::AuthenticationService) gives.
#[derive(Clone)]
pub struct AuthorizationService {
    settings: Arc<AuthorizationSettings>,
    backend: Arc<dyn AuthenticationBackend>,
    lifecycle: Arc<dyn SessionLifecycle>,
    callback_path: String,
}

impl AuthorizationService {
    pub fn new(
        settings: Arc<AuthorizationSettings>,
        backend: Arc<dyn AuthenticationBackend>,
        lifecycle: Arc<dyn SessionLifecycle>,
        callback_path: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            backend,
            lifecycle,
            callback_path: callback_path.into(),
        }
    }

    /// Redirect target at the identity provider. `redirect_uri` stays relative.
    pub fn begin(&self) -> String {
        AuthorizationRequestParams::new(self.settings.client_id.clone(), self.callback_path.clone())
            .redirect_url(&self.settings.authorization_endpoint)
    }

    pub async fn complete(
        &self,
        session: &mut Session,
        code: Option<String>,
        state: Option<String>,
    ) -> DomainResult<CallbackOutcome> {
        match (code, state) {
            (Some(code), Some(state)) => {
                let request = AuthenticationRequest {
                    code,
                    state,
                    nonce: None,
                };
                establish(&*self.backend, &*self.lifecycle, session, request).await
            }
            _ => {
                tracing::warn!("Authorization callback without code or state");
                Ok(CallbackOutcome::Failure(FailureReason::MissingParameters))
            }
        }
    }
}
