use crate::domain::entities::Principal;

/// Session key holding the anti-CSRF `state` of the pending flow.
pub const SESSION_STATE_KEY: &str = "oidc_state";
/// Session key holding the single-use `nonce` of the pending flow.
pub const SESSION_NONCE_KEY: &str = "oidc_nonce";
/// Session key holding where to send the user-agent after a successful login.
pub const SESSION_LOGIN_NEXT_KEY: &str = "oidc_login_next";

/// Values bound to the user-agent's session between the two legs of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProtocolState {
    pub state: String,
    pub nonce: Option<String>,
    pub login_next: Option<String>,
}

/// Why a callback did not produce a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    MissingParameters,
    MissingSessionState,
    NoPrincipal,
    InactivePrincipal,
    BackendError(String),
}

impl FailureReason {
    pub fn as_str(&self) -> &str {
        match self {
            FailureReason::MissingParameters => "missing code or state",
            FailureReason::MissingSessionState => "missing session state",
            FailureReason::NoPrincipal => "no principal returned",
            FailureReason::InactivePrincipal => "principal is inactive",
            FailureReason::BackendError(_) => "authentication backend error",
        }
    }
}

/// Terminal result of a callback that did not raise a security violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success(Principal),
    Failure(FailureReason),
}
