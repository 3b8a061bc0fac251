mod common;

use axum::http::{HeaderValue, StatusCode};
use common::{cookie_header, login_as, register, server, server_with_ttl, session_cookie};
use monster_auth::config::SESSION_COOKIE_NAME;
use monster_auth::password::verify_password;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn test_liveness() {
    let server = server().await;

    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "api": "up" }));
}

#[tokio::test]
async fn test_request_without_cookie_gets_fresh_session_cookie() {
    let server = server().await;

    let first = server.get("/").await;
    let second = server.get("/").await;

    let first_cookie = first.cookie(SESSION_COOKIE_NAME);
    let second_cookie = second.cookie(SESSION_COOKIE_NAME);
    assert_ne!(first_cookie.value(), second_cookie.value());
    assert_eq!(first_cookie.http_only(), Some(true));
}

#[tokio::test]
async fn test_security_headers_present() {
    let server = server().await;

    let response = server.get("/").await;
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "SAMEORIGIN");
    assert_eq!(response.header("x-dns-prefetch-control"), "off");
}

#[tokio::test]
async fn test_hash_endpoint() {
    let server = server().await;

    let response = server
        .get("/hash")
        .add_header(
            axum::http::HeaderName::from_static("password"),
            HeaderValue::from_static("pass"),
        )
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["password"], "pass");
    let hash = body["hash"].as_str().expect("hash string");
    assert!(hash.starts_with("$2b$04$"));
    assert!(verify_password("pass", hash).unwrap());
}

#[tokio::test]
async fn test_hash_endpoint_without_header_is_500() {
    let server = server().await;

    let response = server.get("/hash").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("password is required"));
}

#[tokio::test]
async fn test_register_hides_password_hash() {
    let server = server().await;

    let response = register(&server, "sam", "pass").await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["username"], "sam");
    assert!(body["id"].is_i64());
    assert!(body.get("password_hash").is_none());
    assert!(!response.text().contains("$2b$"));
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_blanks() {
    let server = server().await;

    register(&server, "sam", "pass").await.assert_status(StatusCode::CREATED);
    register(&server, "sam", "other").await.assert_status(StatusCode::BAD_REQUEST);
    register(&server, "", "pass").await.assert_status(StatusCode::BAD_REQUEST);
    register(&server, "frodo", "").await.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_then_users_with_cookie_is_200_without_is_401() {
    let server = server().await;
    let cookie = login_as(&server, "sam", "pass").await;

    server
        .get("/api/users")
        .add_header(cookie_header(), cookie)
        .await
        .assert_status_ok();

    server
        .get("/api/users")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_response() {
    let server = server().await;
    register(&server, "sam", "pass").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": "sam", "password": "pass" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Welcome sam!");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_are_401() {
    let server = server().await;
    register(&server, "sam", "pass").await;

    for (username, password) in [("sam", "wrong"), ("nobody", "pass")] {
        let response = server
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Unauthorized: Invalid credentials" }));
    }
}

#[tokio::test]
async fn test_anonymous_session_does_not_pass_guard() {
    let server = server().await;

    let anonymous = session_cookie(&server.get("/").await);

    server
        .get("/api/users")
        .add_header(cookie_header(), anonymous)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rotates_session_id() {
    let server = server().await;
    register(&server, "sam", "pass").await;

    let anonymous = session_cookie(&server.get("/").await);
    let response = server
        .post("/api/auth/login")
        .add_header(cookie_header(), anonymous.clone())
        .json(&json!({ "username": "sam", "password": "pass" }))
        .await;
    response.assert_status_ok();

    let authenticated = session_cookie(&response);
    assert_ne!(anonymous, authenticated);

    // The pre-login id is gone
    server
        .get("/api/users")
        .add_header(cookie_header(), anonymous)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_cookie_is_rejected() {
    let server = server().await;
    login_as(&server, "sam", "pass").await;

    server
        .get("/api/users")
        .add_header(
            cookie_header(),
            HeaderValue::from_static("monster=not-a-signed-session-id"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let server = server().await;
    let cookie = login_as(&server, "sam", "pass").await;

    server
        .post("/api/auth/logout")
        .add_header(cookie_header(), cookie.clone())
        .await
        .assert_status_ok();

    server
        .get("/api/users")
        .add_header(cookie_header(), cookie)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_info() {
    let server = server().await;

    server
        .get("/api/auth/session")
        .await
        .assert_json(&json!({ "authenticated": false }));

    let cookie = login_as(&server, "sam", "pass").await;
    let body: Value = server
        .get("/api/auth/session")
        .add_header(cookie_header(), cookie)
        .await
        .json();
    assert_eq!(body["authenticated"], true);
    assert!(body["user_id"].is_i64());
}

#[tokio::test]
async fn test_expired_session_never_passes_guard() {
    let server = server_with_ttl(1).await;
    let cookie = login_as(&server, "sam", "pass").await;

    server
        .get("/api/users")
        .add_header(cookie_header(), cookie.clone())
        .await
        .assert_status_ok();

    tokio::time::sleep(Duration::from_millis(2500)).await;

    server
        .get("/api/users")
        .add_header(cookie_header(), cookie)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_hash_endpoint_accepts_non_ascii_header() {
    let server = server().await;

    let response = server
        .get("/hash")
        .add_header(
            axum::http::HeaderName::from_static("password"),
            HeaderValue::from_bytes(b"p\xe4ss").unwrap(),
        )
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let password = body["password"].as_str().unwrap();
    assert_eq!(password, "p\u{FFFD}ss");
    assert!(verify_password(password, body["hash"].as_str().unwrap()).unwrap());
}

#[tokio::test]
async fn test_session_lifespan_is_not_extended_by_reads() {
    // Lifespan counts from the last session write (login), not the last request
    let server = server_with_ttl(3).await;
    let cookie = login_as(&server, "sam", "pass").await;

    for _ in 0..2 {
        tokio::time::sleep(Duration::from_millis(900)).await;
        server
            .get("/api/users")
            .add_header(cookie_header(), cookie.clone())
            .await
            .assert_status_ok();
    }

    tokio::time::sleep(Duration::from_millis(1700)).await;
    server
        .get("/api/users")
        .add_header(cookie_header(), cookie)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
