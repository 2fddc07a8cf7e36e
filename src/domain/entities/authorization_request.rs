use url::Url;

pub const RESPONSE_TYPE_CODE: &str = "code";
pub const SCOPE_OPENID: &str = "openid";

/// Query parameters of the redirect that sends the user-agent to the
/// identity provider. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequestParams {
    pub client_id: String,
    pub redirect_uri: String,
    pub state: Option<String>,
    pub nonce: Option<String>,
}

impl AuthorizationRequestParams {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            state: None,
            nonce: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Ordered `(name, value)` pairs as they appear in the query string.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            ("response_type", RESPONSE_TYPE_CODE),
            ("scope", SCOPE_OPENID),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if let Some(state) = &self.state {
            pairs.push(("state", state.as_str()));
        }
        if let Some(nonce) = &self.nonce {
            pairs.push(("nonce", nonce.as_str()));
        }
        pairs
    }

    /// `<authorization_endpoint>?<url-encoded params>`
    pub fn redirect_url(&self, authorization_endpoint: &Url) -> String {
        let mut url = authorization_endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.pairs());
        url.to_string()
    }
}
