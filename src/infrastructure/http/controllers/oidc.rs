use crate::domain::entities::{CallbackOutcome, Principal};
use crate::domain::ports::{Session, SessionLifecycle};
use crate::infrastructure::http::controllers::redirect_found;
use crate::infrastructure::http::middleware::{
    expired_session_cookie, session_cookie, ApiError, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

impl CallbackParams {
    /// Pick `code` and `state` out of raw pairs. A repeated name keeps its last
    /// value, so malformed input still reaches the callback logic instead of
    /// being rejected by the extractor.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (name, value) in pairs {
            match name.as_str() {
                "code" => params.code = Some(value),
                "state" => params.state = Some(value),
                _ => {}
            }
        }
        params
    }
}

/// Start the code flow: bind `state`/`nonce` to the session and send the
/// user-agent to the identity provider.
pub async fn authentication_request(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let service = &state.authentication_service;
    let login_next = params.get(&service.settings().redirect_field_name).cloned();

    let url = service.begin(&session, login_next).await?;
    tracing::debug!("Redirecting to identity provider for authentication");

    Ok((session_cookie(&state.session_settings, &session), redirect_found(&url)).into_response())
}

/// Provider redirect back to us with `code` and `state`.
pub async fn authentication_callback(
    State(state): State<AppState>,
    mut session: Session,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let params = CallbackParams::from_pairs(pairs);
    let service = &state.authentication_service;
    let outcome = service
        .complete(&mut session, params.code, params.state)
        .await?;

    let url = match outcome {
        CallbackOutcome::Success(_) => service.success_url(&session).await?,
        CallbackOutcome::Failure(_) => service.failure_url().to_string(),
    };

    Ok((session_cookie(&state.session_settings, &session), redirect_found(&url)).into_response())
}

pub async fn logout(State(state): State<AppState>, mut session: Session) -> ApiResult<Response> {
    if let Some(principal) = state.session_service.current(&session).await? {
        tracing::info!("Logout for subject {}", principal.subject);
    }
    state.session_service.logout(&mut session).await?;
    metrics::counter!("oidc_logout_total").increment(1);

    let url = &state.authentication_service.settings().logout_redirect_url;
    Ok((expired_session_cookie(&state.session_settings), redirect_found(url)).into_response())
}

/// The principal the session is logged in as.
pub async fn get_session(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Principal>> {
    state
        .session_service
        .current(&session)
        .await?
        .map(Json)
        .ok_or(ApiError::Unauthorized)
}
