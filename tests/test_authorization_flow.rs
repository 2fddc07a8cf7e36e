mod helpers;

use axum::http::StatusCode;
use helpers::*;

fn configured_app(extra: &[(&str, &str)]) -> TestApp {
    let mut vars = vec![
        ("OIDC_AUTHORIZATION_ENDPOINT", "https://idp.example/authorize"),
        ("OIDC_AUTHORIZATION_CLIENT_ID", "simple-client"),
    ];
    vars.extend_from_slice(extra);
    TestApp::with_vars(&vars)
}

#[tokio::test]
async fn test_endpoints_absent_when_not_configured() {
    let app = TestApp::new();

    let response = app.get("/oidc/authorization/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_form("/oidc/authorization/callback/", "code=c&state=s", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_has_no_anti_forgery_binding() {
    let app = configured_app(&[]);

    let response = app.get("/oidc/authorization/", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    let redirect = location(&response);
    assert!(redirect.starts_with("https://idp.example/authorize?"));
    assert_eq!(
        query_param(&redirect, "client_id").as_deref(),
        Some("simple-client")
    );
    assert_eq!(query_param(&redirect, "response_type").as_deref(), Some("code"));
    assert_eq!(query_param(&redirect, "scope").as_deref(), Some("openid"));
    // Relative, not absolutified
    assert_eq!(
        query_param(&redirect, "redirect_uri").as_deref(),
        Some("/oidc/authorization/callback/")
    );
    assert!(query_param(&redirect, "state").is_none());
    assert!(query_param(&redirect, "nonce").is_none());
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn test_callback_trusts_backend_without_session_state() {
    let app = configured_app(&[("LOGIN_REDIRECT_URL", "/home")]);

    // No flow was started, so the session holds no state at all
    let response = app
        .post_form(
            "/oidc/authorization/callback/",
            "code=the-code&state=whatever",
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/home");

    let requests = app.backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].code, "the-code");
    assert_eq!(requests[0].state, "whatever");
    assert_eq!(requests[0].nonce, None);

    let key = session_key(&response).expect("session cookie");
    assert!(app.session_principal(&key).await.is_some());
}

#[tokio::test]
async fn test_callback_missing_state_fails() {
    let app = configured_app(&[("LOGIN_REDIRECT_URL_FAILURE", "/failed")]);

    let response = app
        .post_form("/oidc/authorization/callback/", "code=c", None)
        .await;

    assert_eq!(location(&response), "/failed");
    assert!(app.backend.requests().is_empty());
}

#[tokio::test]
async fn test_callback_without_body_fails() {
    let app = configured_app(&[("LOGIN_REDIRECT_URL_FAILURE", "/failed")]);

    let response = app
        .post_form("/oidc/authorization/callback/", "", None)
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/failed");
}

#[tokio::test]
async fn test_callback_inactive_principal_fails() {
    let app = configured_app(&[("LOGIN_REDIRECT_URL_FAILURE", "/failed")]);
    app.backend.set_reply(BackendReply::Inactive);

    let response = app
        .post_form("/oidc/authorization/callback/", "code=c&state=s", None)
        .await;

    assert_eq!(location(&response), "/failed");
    let key = session_key(&response).unwrap();
    assert!(app.session_principal(&key).await.is_none());
}

#[tokio::test]
async fn test_callback_only_accepts_post() {
    let app = configured_app(&[]);

    let response = app
        .get("/oidc/authorization/callback/?code=c&state=s", None)
        .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_callback_repeated_fields_use_last_value() {
    let app = configured_app(&[("LOGIN_REDIRECT_URL", "/home")]);

    let response = app
        .post_form(
            "/oidc/authorization/callback/",
            "code=first&state=s1&code=second&state=s2",
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/home");
    let requests = app.backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].code, "second");
    assert_eq!(requests[0].state, "s2");
}
