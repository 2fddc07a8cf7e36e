use crate::application::services::AuthorizationService;
use crate::domain::entities::CallbackOutcome;
use crate::domain::ports::Session;
use crate::infrastructure::http::controllers::{oidc::CallbackParams, redirect_found};
use crate::infrastructure::http::middleware::{session_cookie, ApiError, ApiResult, AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};

fn authorization_service(state: &AppState) -> ApiResult<&AuthorizationService> {
    state
        .authorization_service
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("Authorization endpoints are not configured".to_string()))
}

pub async fn authorization_request(State(state): State<AppState>) -> ApiResult<Response> {
    let url = authorization_service(&state)?.begin();
    Ok(redirect_found(&url))
}

/// POSTed by the identity provider. No session-bound `state` check happens here.
pub async fn authorization_callback(
    State(state): State<AppState>,
    mut session: Session,
    form: Option<Form<Vec<(String, String)>>>,
) -> ApiResult<Response> {
    let service = authorization_service(&state)?;
    let params = form
        .map(|Form(pairs)| CallbackParams::from_pairs(pairs))
        .unwrap_or_default();

    let outcome = service
        .complete(&mut session, params.code, params.state)
        .await?;

    let settings = state.authentication_service.settings();
    let url = match outcome {
        CallbackOutcome::Success(_) => settings.login_redirect_url.as_str(),
        CallbackOutcome::Failure(_) => settings.login_redirect_url_failure.as_str(),
    };

    Ok((session_cookie(&state.session_settings, &session), redirect_found(url)).into_response())
}
