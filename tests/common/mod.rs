#![allow(dead_code)]

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use monster_auth::config::SESSION_COOKIE_NAME;
use monster_auth::{build_router, db, AppState, Config};
use serde_json::json;

pub fn test_config(session_ttl_secs: i64) -> Config {
    Config {
        hash_rounds: 4,
        session_ttl_secs,
        session_secret: Some("keep it secret, keep it safe!".to_string()),
        ..Config::from_lookup(|_| None).expect("default config")
    }
}

pub async fn server_with_ttl(session_ttl_secs: i64) -> TestServer {
    let pool = db::connect_in_memory().await.expect("in-memory database");
    let state = AppState::from_pool(pool, test_config(session_ttl_secs))
        .await
        .expect("app state");
    TestServer::new(build_router(state)).expect("test server")
}

pub async fn server() -> TestServer {
    server_with_ttl(600).await
}

/// `Cookie` request header replaying the session cookie a response set.
pub fn session_cookie(response: &TestResponse) -> HeaderValue {
    let cookie = response.cookie(SESSION_COOKIE_NAME);
    HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE_NAME, cookie.value()))
        .expect("cookie header")
}

pub fn cookie_header() -> HeaderName {
    header::COOKIE
}

pub async fn register(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post("/api/auth/register")
        .json(&json!({ "username": username, "password": password }))
        .await
}

/// Register then log in, returning the authenticated session cookie.
pub async fn login_as(server: &TestServer, username: &str, password: &str) -> HeaderValue {
    register(server, username, password)
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();

    session_cookie(&response)
}
