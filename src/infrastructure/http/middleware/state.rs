use crate::application::services::{
    AntiForgeryContext, AuthenticationService, AuthorizationService, SessionService,
};
use crate::config::{Config, SessionSettings};
use crate::domain::ports::{AuthenticationBackend, SessionLifecycle, SessionStore, TokenGenerator};
use crate::infrastructure::http::router::{AUTHORIZATION_CALLBACK_PATH, CALLBACK_PATH};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session_settings: Arc<SessionSettings>,
    pub session_store: Arc<dyn SessionStore>,
    pub session_service: SessionService,
    pub authentication_service: AuthenticationService,
    /// Present only when the simplified endpoints are configured.
    pub authorization_service: Option<AuthorizationService>,
}

impl AppState {
    pub fn new(
        config: &Config,
        session_store: Arc<dyn SessionStore>,
        backend: Arc<dyn AuthenticationBackend>,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        let session_service = SessionService::new(tokens.clone());
        let lifecycle: Arc<dyn SessionLifecycle> = Arc::new(session_service.clone());

        let authentication_service = AuthenticationService::new(
            Arc::new(config.oidc.clone()),
            AntiForgeryContext::new(tokens),
            backend.clone(),
            lifecycle.clone(),
            CALLBACK_PATH,
        );

        let authorization_service = config.authorization.clone().map(|settings| {
            AuthorizationService::new(
                Arc::new(settings),
                backend,
                lifecycle,
                AUTHORIZATION_CALLBACK_PATH,
            )
        });

        Self {
            session_settings: Arc::new(config.session.clone()),
            session_store,
            session_service,
            authentication_service,
            authorization_service,
        }
    }
}
