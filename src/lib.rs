//! # monster-auth
//!
//! A small user API behind a session-cookie login gate.
//!
//! - `password`: bcrypt hashing and verification
//! - `session`: SQLite-backed session store, cookie key, expiry sweep
//! - `middleware`: the protected-route guard, session bootstrap, security headers
//! - `handlers`: liveness, `/hash`, auth and user routes
//! - `routes`: wires it all into one `axum::Router`

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
