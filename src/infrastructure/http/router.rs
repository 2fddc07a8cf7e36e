use crate::infrastructure::http::controllers::{authorization, oidc};
use crate::infrastructure::http::middleware::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub const AUTHENTICATE_PATH: &str = "/oidc/authenticate/";
pub const CALLBACK_PATH: &str = "/oidc/callback/";
pub const AUTHORIZATION_PATH: &str = "/oidc/authorization/";
pub const AUTHORIZATION_CALLBACK_PATH: &str = "/oidc/authorization/callback/";
pub const LOGOUT_PATH: &str = "/oidc/logout/";
pub const SESSION_PATH: &str = "/oidc/session";

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route(AUTHENTICATE_PATH, get(oidc::authentication_request))
        .route(CALLBACK_PATH, get(oidc::authentication_callback))
        .route(LOGOUT_PATH, get(oidc::logout))
        .route(SESSION_PATH, get(oidc::get_session));

    // Simplified endpoints only exist when their client is configured
    if state.authorization_service.is_some() {
        router = router
            .route(AUTHORIZATION_PATH, get(authorization::authorization_request))
            .route(
                AUTHORIZATION_CALLBACK_PATH,
                post(authorization::authorization_callback),
            );
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
