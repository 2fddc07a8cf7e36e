use crate::config::SessionSettings;
use crate::domain::ports::Session;
use crate::infrastructure::http::middleware::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;

/// Loads the session named by the request's session cookie, or starts a new
/// one when the cookie is missing.
#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let key = jar
            .get(&state.session_settings.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| state.session_service.new_session_key());

        Ok(Session::new(state.session_store.clone(), key))
    }
}

/// Cookie jar carrying the session key back to the user-agent.
pub fn session_cookie(settings: &SessionSettings, session: &Session) -> CookieJar {
    let cookie = Cookie::build((settings.cookie_name.clone(), session.key().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(settings.duration_hours))
        .build();

    CookieJar::new().add(cookie)
}

/// Cookie jar telling the user-agent to drop its session cookie.
pub fn expired_session_cookie(settings: &SessionSettings) -> CookieJar {
    let cookie = Cookie::build((settings.cookie_name.clone(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build();

    CookieJar::new().add(cookie)
}
