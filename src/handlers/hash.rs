//! # Hash Demo Handler
//!
//! Debug endpoint showing what a stored password looks like. Not meant for
//! production use: it echoes the plaintext back.

use crate::error::AppResult;
use crate::password::{self, PasswordError};
use crate::state::AppState;
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

/// Request header carrying the plaintext.
pub const PASSWORD_HEADER: &str = "password";

#[derive(Debug, Serialize)]
pub struct HashResponse {
    pub password: String,
    pub hash: String,
}

/// Hash the password found in the `password` header
///
/// ## Route
/// GET /hash
///
/// ## Response
/// ```json
/// {
///   "password": "pass",
///   "hash": "$2b$08$..."
/// }
/// ```
///
/// ## Errors
/// Any hashing failure, a missing header included, is a 500 carrying the raw
/// error message: `{ "error": "Illegal arguments: password is required" }`
pub async fn hash_password(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<HashResponse>> {
    // Any byte sequence is accepted; invalid UTF-8 becomes U+FFFD
    let password = match headers.get(PASSWORD_HEADER) {
        Some(value) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
        None => return Err(PasswordError::MissingInput.into()),
    };

    let hash = password::hash_password_blocking(password.clone(), state.config.hash_rounds).await?;

    Ok(Json(HashResponse { password, hash }))
}
