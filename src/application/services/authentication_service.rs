use crate::application::services::anti_forgery::AntiForgeryContext;
use crate::config::OidcSettings;
use crate::domain::entities::{
    AuthorizationRequestParams, CallbackOutcome, FailureReason, SessionProtocolState,
    SESSION_LOGIN_NEXT_KEY,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{AuthenticationBackend, AuthenticationRequest, Session, SessionLifecycle};
use crate::shared::utils::absolute_url::absolutify;
use std::sync::Arc;

/// Code-flow relying party: starts the flow at the identity provider and
/// completes it when the provider redirects back.
#[derive(Clone)]
pub struct AuthenticationService {
    settings: Arc<OidcSettings>,
    anti_forgery: AntiForgeryContext,
    backend: Arc<dyn AuthenticationBackend>,
    lifecycle: Arc<dyn SessionLifecycle>,
    callback_path: String,
}

impl AuthenticationService {
    pub fn new(
        settings: Arc<OidcSettings>,
        anti_forgery: AntiForgeryContext,
        backend: Arc<dyn AuthenticationBackend>,
        lifecycle: Arc<dyn SessionLifecycle>,
        callback_path: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            anti_forgery,
            backend,
            lifecycle,
            callback_path: callback_path.into(),
        }
    }

    pub fn settings(&self) -> &OidcSettings {
        &self.settings
    }

    /// Seed a fresh `state` (and `nonce` when enabled) into the session and
    /// return the identity provider URL to redirect to.
    pub async fn begin(&self, session: &Session, login_next: Option<String>) -> DomainResult<String> {
        let state = self.anti_forgery.generate_state(self.settings.state_size);
        let nonce = self
            .settings
            .use_nonce
            .then(|| self.anti_forgery.generate_nonce(self.settings.nonce_size));

        let redirect_uri = absolutify(&self.settings.site_url, &self.callback_path)?;
        let mut params =
            AuthorizationRequestParams::new(self.settings.client_id.clone(), redirect_uri)
                .with_state(state.clone());
        if let Some(nonce) = &nonce {
            params = params.with_nonce(nonce.clone());
        }

        self.anti_forgery
            .seed(
                session,
                &SessionProtocolState {
                    state,
                    nonce,
                    login_next,
                },
            )
            .await?;

        metrics::counter!("oidc_authentication_requests_total").increment(1);
        Ok(params.redirect_url(&self.settings.authorization_endpoint))
    }

    /// Evaluate a provider callback.
    ///
    /// Order matters: the nonce is consumed first, unconditionally. A missing
    /// session `state` is an ordinary failure, a differing one is returned as
    /// [`DomainError::SuspiciousOperation`]. Backend errors become failures.
    pub async fn complete(
        &self,
        session: &mut Session,
        code: Option<String>,
        state: Option<String>,
    ) -> DomainResult<CallbackOutcome> {
        let nonce = self.anti_forgery.consume_nonce(session).await?;

        let (code, state) = match (code, state) {
            (Some(code), Some(state)) => (code, state),
            _ => return Ok(self.failure(FailureReason::MissingParameters)),
        };

        let stored_state = match self.anti_forgery.stored_state(session).await? {
            Some(stored) => stored,
            None => return Ok(self.failure(FailureReason::MissingSessionState)),
        };

        if !AntiForgeryContext::validate_state(&state, Some(&stored_state)) {
            metrics::counter!("oidc_callback_total", "outcome" => "suspicious").increment(1);
            return Err(DomainError::SuspiciousOperation(
                "Session `oidc_state` does not match the OIDC callback state".to_string(),
            ));
        }

        let request = AuthenticationRequest { code, state, nonce };
        establish(&*self.backend, &*self.lifecycle, session, request).await
    }

    /// The stored login target, else the configured default.
    pub async fn success_url(&self, session: &Session) -> DomainResult<String> {
        Ok(session
            .get(SESSION_LOGIN_NEXT_KEY)
            .await?
            .filter(|next| !next.is_empty())
            .unwrap_or_else(|| self.settings.login_redirect_url.clone()))
    }

    pub fn failure_url(&self) -> &str {
        &self.settings.login_redirect_url_failure
    }

    fn failure(&self, reason: FailureReason) -> CallbackOutcome {
        record_failure(&reason);
        CallbackOutcome::Failure(reason)
    }
}

/// Hand the credentials to the backend and log the principal in if it is active.
pub(crate) async fn establish(
    backend: &dyn AuthenticationBackend,
    lifecycle: &dyn SessionLifecycle,
    session: &mut Session,
    request: AuthenticationRequest,
) -> DomainResult<CallbackOutcome> {
    let principal = match backend.authenticate(request).await {
        Ok(Some(principal)) => principal,
        Ok(None) => {
            record_failure(&FailureReason::NoPrincipal);
            return Ok(CallbackOutcome::Failure(FailureReason::NoPrincipal));
        }
        Err(e) => {
            let reason = FailureReason::BackendError(e.to_string());
            record_failure(&reason);
            return Ok(CallbackOutcome::Failure(reason));
        }
    };

    if !principal.is_active {
        record_failure(&FailureReason::InactivePrincipal);
        return Ok(CallbackOutcome::Failure(FailureReason::InactivePrincipal));
    }

    lifecycle.login(session, &principal).await?;

    metrics::counter!("oidc_callback_total", "outcome" => "success").increment(1);
    tracing::info!("OIDC login successful for subject {}", principal.subject);
    Ok(CallbackOutcome::Success(principal))
}

fn record_failure(reason: &FailureReason) {
    metrics::counter!("oidc_callback_total", "outcome" => "failure").increment(1);
    match reason {
        FailureReason::BackendError(detail) => {
            tracing::warn!("OIDC login failed: {} ({})", reason.as_str(), detail)
        }
        _ => tracing::warn!("OIDC login failed: {}", reason.as_str()),
    }
}
