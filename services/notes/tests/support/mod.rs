//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use notes::{
    AppState,
    jwt::{JwtConfig, JwtService},
    routes::create_router,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cure-password";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-of-sufficient-length".to_string(),
        issuer: "notes".to_string(),
        audience: "notes-clients".to_string(),
        expire_minutes: 60,
        leeway_seconds: 0,
    }
}

/// Fresh in-memory state; keep it to inspect the store after requests
pub fn test_state() -> AppState {
    let jwt_service = JwtService::new(jwt_config()).expect("valid test JWT config");
    AppState::in_memory(jwt_service)
}

pub fn app(state: &AppState) -> Router {
    create_router(state.clone())
}

/// Send one request and decode the JSON body (`Value::Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}

/// Register a user and return its id
pub async fn register(app: &Router, name: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    body["user"]["id"].as_i64().expect("numeric user id")
}

/// Log in and return the bearer token
pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": email, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    body["token"].as_str().expect("token string").to_string()
}

/// Register then log in; returns `(user id, token)`
pub async fn signed_in(app: &Router, name: &str, email: &str) -> (i64, String) {
    let id = register(app, name, email).await;
    let token = login(app, email).await;
    (id, token)
}
