//! # Database Models
//!
//! Data structures that map to the `users` table, plus the input shapes used
//! to create and update rows.

use serde::Serialize;

/// User account
///
/// ## Derive Macros
/// - `Serialize`: API responses. The password hash is skipped so it can never
///   leave the server, whichever handler returns a `User`.
/// - `sqlx::FromRow`: maps a `users` row onto this struct
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Auto-incremented identifier, the identity stored in the session
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// bcrypt hash of the password, never the plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional free-form role ("admin", "student", ...)
    pub role: Option<String>,

    /// When the row was inserted (SQLite `CURRENT_TIMESTAMP`, UTC)
    pub created_at: String,
}

/// Values needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Option<String>,
}

/// Partial update of a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password_hash.is_none() && self.role.is_none()
    }
}
