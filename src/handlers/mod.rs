//! # HTTP Request Handlers
//!
//! ## Submodules
//! - `health`: Liveness endpoint
//! - `hash`: Demo endpoint that hashes a password sent in a header
//! - `auth`: Register, login, logout and session status
//! - `users`: User CRUD (behind the `require_auth` guard)
//!
//! Handlers extract what they need (state, session, path, JSON body), call
//! into `db`/`password`/`session`, and return `AppResult<...>` so errors turn
//! into JSON responses through `AppError`.

pub mod auth;
pub mod hash;
pub mod health;
pub mod users;
