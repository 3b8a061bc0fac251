//! # User Handlers
//!
//! CRUD over the users table. Every route here sits behind `require_auth`.
//! Responses are serialized from `User`, which never includes the password hash.

use crate::db::models::{User, UserChanges};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::password::{self, MAX_PASSWORD_BYTES};
use crate::session;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;

/// Body of `PUT /api/users/{id}`. Absent fields are left unchanged.
///
/// ## Example JSON
/// ```json
/// { "role": "admin", "password": "new-pass" }
/// ```
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// List every user
///
/// ## Route
/// GET /api/users
///
/// ## Response
/// ```json
/// [
///   { "id": 1, "username": "sam", "role": null, "created_at": "2024-01-15 10:30:00" }
/// ]
/// ```
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(users::list_users(&state.db).await?))
}

/// Get the logged-in user's profile
///
/// ## Route
/// GET /api/users/me
///
/// The guard already checked the session, but the id still has to be read.
pub async fn get_current_user(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<User>> {
    let user_id = session::current_user_id(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(users::find_by_id(&state.db, user_id).await?))
}

/// Get one user
///
/// ## Route
/// GET /api/users/{id}
///
/// ## Errors
/// - 404: no user with this id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(users::find_by_id(&state.db, user_id).await?))
}

/// Update a user
///
/// ## Route
/// PUT /api/users/{id}
///
/// ## Response
/// The updated user, same shape as `GET /api/users/{id}`.
///
/// Only the fields present in the body change. A new password is hashed
/// with the configured cost before it is stored.
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let username = req.username.map(|u| u.trim().to_string());
    if username.as_deref() == Some("") {
        return Err(AppError::BadRequest("username cannot be empty".to_string()));
    }

    let password_hash = match req.password {
        Some(p) if p.is_empty() => {
            return Err(AppError::BadRequest("password cannot be empty".to_string()))
        }
        Some(p) if p.len() > MAX_PASSWORD_BYTES => {
            return Err(AppError::BadRequest(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )))
        }
        Some(p) => Some(password::hash_password_blocking(p, state.config.hash_rounds).await?),
        None => None,
    };

    let changes = UserChanges {
        username,
        password_hash,
        role: req.role,
    };
    if changes.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_string()));
    }

    Ok(Json(users::update_user(&state.db, user_id, &changes).await?))
}

/// Delete a user
///
/// ## Route
/// DELETE /api/users/{id}
///
/// ## Response
/// `204 No Content`, or 404 when the user doesn't exist.
///
/// Deleting your own account ends your session right away. Other sessions
/// of the deleted user are flushed by `require_auth` on their next request,
/// since the user row is gone.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    session: Session,
) -> AppResult<StatusCode> {
    users::delete_user(&state.db, user_id).await?;

    if session::current_user_id(&session).await? == Some(user_id) {
        session.flush().await?;
    }

    tracing::info!(user_id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
