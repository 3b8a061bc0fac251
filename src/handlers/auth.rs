//! # Auth Handlers
//!
//! Registration, password login, logout and session status. Login is the only
//! place a session becomes authenticated (see `session::attach_user`).

use crate::db::{models::NewUser, users};
use crate::error::{AppError, AppResult};
use crate::password::{self, MAX_PASSWORD_BYTES};
use crate::session;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

/// Body of `POST /api/auth/register`
///
/// ## Example JSON
/// ```json
/// { "username": "sam", "password": "pass", "role": "student" }
/// ```
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Same message whether the username or the password was wrong
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Create a user account
///
/// ## Route
/// POST /api/auth/register
///
/// ## Response
/// `201 Created`
/// ```json
/// { "id": 1, "username": "sam", "role": null, "created_at": "2024-01-15 10:30:00" }
/// ```
///
/// ## Errors
/// - 400: empty username/password, password over 72 bytes, username taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let username = req.username.trim();
    validate_credentials(username, &req.password)?;

    if users::find_by_username(&state.db, username).await.is_ok() {
        return Err(AppError::BadRequest(format!("User '{}' already exists", username)));
    }

    let password_hash = password::hash_password_blocking(req.password, state.config.hash_rounds).await?;
    let user = users::create_user(
        &state.db,
        &NewUser {
            username: username.to_string(),
            password_hash,
            role: req.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Registered user '{}'", user.username);

    Ok((StatusCode::CREATED, Json(json!(user))))
}

/// Log in with username and password
///
/// ## Route
/// POST /api/auth/login
///
/// ## Response
/// ```json
/// { "message": "Welcome sam!", "user_id": 1 }
/// ```
/// The response also sets the `monster` session cookie, now carrying `user_id`.
///
/// ## Errors
/// - 401 `Invalid credentials`: unknown user or wrong password (same message for both)
pub async fn login(
    session: Session,
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let user = match users::find_by_username(&state.db, req.username.trim()).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => {
            tracing::info!("Login failed: unknown user '{}'", req.username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        Err(e) => return Err(e),
    };

    let valid = password::verify_password_blocking(req.password, user.password_hash.clone()).await?;
    if !valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    session::attach_user(&session, user.id).await?;
    tracing::info!(user_id = user.id, "User '{}' logged in", user.username);

    Ok(Json(json!({
        "message": format!("Welcome {}!", user.username),
        "user_id": user.id
    })))
}

/// End the session
///
/// ## Route
/// POST /api/auth/logout
///
/// Deletes the session record and clears the cookie. Works for anonymous
/// sessions too.
pub async fn logout(session: Session) -> AppResult<Json<Value>> {
    let user_id = session::current_user_id(&session).await?;
    session.flush().await?;

    if let Some(id) = user_id {
        tracing::info!(user_id = id, "User logged out");
    }

    Ok(Json(json!({
        "message": "Logged out"
    })))
}

/// Report whether the caller is logged in
///
/// ## Route
/// GET /api/auth/session
///
/// ## Response
/// ```json
/// { "authenticated": true, "user_id": 1 }
/// ```
/// or `{ "authenticated": false }`
pub async fn session_info(session: Session) -> AppResult<Json<Value>> {
    match session::current_user_id(&session).await? {
        Some(id) => Ok(Json(json!({
            "authenticated": true,
            "user_id": id
        }))),
        None => Ok(Json(json!({
            "authenticated": false
        }))),
    }
}

fn validate_credentials(username: &str, password: &str) -> AppResult<()> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("username and password are required".to_string()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::BadRequest(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}
