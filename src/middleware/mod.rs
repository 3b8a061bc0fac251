//! # Middleware Module
//!
//! Middleware functions run before (or after) the route handlers.
//!
//! ## Our Middleware
//! - `auth`: Rejects requests without an authenticated session (the guard)
//! - `session`: Makes sure every visitor ends up with a persisted session and cookie
//! - `security_headers`: Adds hardening headers to every response

pub mod auth;
pub mod security_headers;
pub mod session;
