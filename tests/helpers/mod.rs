#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use oidc_rp::config::Config;
use oidc_rp::domain::entities::Principal;
use oidc_rp::domain::errors::{DomainError, DomainResult};
use oidc_rp::domain::ports::{AuthenticationBackend, AuthenticationRequest, SessionStore};
use oidc_rp::infrastructure::http::middleware::AppState;
use oidc_rp::infrastructure::http::router::build_router;
use oidc_rp::infrastructure::persistence::MemorySessionStore;
use oidc_rp::infrastructure::providers::OsTokenGenerator;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use url::Url;

pub const AUTH_ENDPOINT: &str = "https://idp.example/auth";
pub const CLIENT_ID: &str = "abc";
pub const SITE_URL: &str = "https://rp.example";
pub const COOKIE_NAME: &str = "sessionid";

/// What the scripted backend answers to the next `authenticate` calls.
#[derive(Debug, Clone)]
pub enum BackendReply {
    Active,
    Inactive,
    NoPrincipal,
    Error,
}

pub struct ScriptedBackend {
    reply: Mutex<BackendReply>,
    requests: Mutex<Vec<AuthenticationRequest>>,
}

impl ScriptedBackend {
    pub fn new(reply: BackendReply) -> Self {
        Self {
            reply: Mutex::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: BackendReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn requests(&self) -> Vec<AuthenticationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AuthenticationBackend for ScriptedBackend {
    async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> DomainResult<Option<Principal>> {
        self.requests.lock().unwrap().push(request);
        let principal = Principal::new("user-1", Some("user@example.com".to_string()));
        match self.reply.lock().unwrap().clone() {
            BackendReply::Active => Ok(Some(principal)),
            BackendReply::Inactive => Ok(Some(principal.inactive())),
            BackendReply::NoPrincipal => Ok(None),
            BackendReply::Error => Err(DomainError::Backend("token endpoint timed out".to_string())),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemorySessionStore>,
    pub backend: Arc<ScriptedBackend>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    /// Required settings plus `overrides`.
    pub fn with_vars(overrides: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = [
            ("OIDC_OP_AUTHORIZATION_ENDPOINT", AUTH_ENDPOINT),
            ("OIDC_RP_CLIENT_ID", CLIENT_ID),
            ("SITE_URL", SITE_URL),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in overrides {
            vars.insert(k.to_string(), v.to_string());
        }

        let config =
            Config::from_lookup(|name| vars.get(name).cloned()).expect("valid test config");
        let store = Arc::new(MemorySessionStore::new());
        let backend = Arc::new(ScriptedBackend::new(BackendReply::Active));

        let state = AppState::new(
            &config,
            store.clone(),
            backend.clone(),
            Arc::new(OsTokenGenerator),
        );

        Self {
            router: build_router(state),
            store,
            backend,
            config,
        }
    }

    pub async fn get(&self, uri: &str, session_key: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(key) = session_key {
            request = request.header(header::COOKIE, format!("{}={}", COOKIE_NAME, key));
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        body: &str,
        session_key: Option<&str>,
    ) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(key) = session_key {
            request = request.header(header::COOKIE, format!("{}={}", COOKIE_NAME, key));
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn session_value(&self, session_key: &str, key: &str) -> Option<String> {
        self.store.get(session_key, key).await.unwrap()
    }

    pub async fn session_principal(&self, session_key: &str) -> Option<serde_json::Value> {
        let response = self.get("/oidc/session", Some(session_key)).await;
        if response.status() != StatusCode::OK {
            return None;
        }
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Some(serde_json::from_slice(&body).unwrap())
    }

    /// Run the authentication request leg and return `(session_key, state, nonce)`.
    pub async fn begin_login(&self, uri: &str) -> (String, String, Option<String>) {
        let response = self.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::FOUND);

        let key = session_key(&response).expect("session cookie issued");
        let redirect = location(&response);
        let state = query_param(&redirect, "state").expect("state in redirect");
        let nonce = query_param(&redirect, "nonce");
        (key, state, nonce)
    }
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Value of the session cookie set by the response, if any.
pub fn session_key(response: &Response<Body>) -> Option<String> {
    set_cookie(response).and_then(|cookie| {
        cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix(&format!("{}=", COOKIE_NAME)))
            .map(|value| value.to_string())
    })
}

/// The raw `Set-Cookie` header for the session cookie.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", COOKIE_NAME)))
        .map(|value| value.to_string())
}

pub fn query_param(url: &str, name: &str) -> Option<String> {
    let base = Url::parse("http://relative.invalid").unwrap();
    let url = base.join(url).unwrap();
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
