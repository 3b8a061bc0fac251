//! # Router
//!
//! Builds the full application: routes, the session layer and the
//! cross-cutting middleware.
//!
//! Request path, outermost first:
//! `TraceLayer → CORS → security headers → session manager → ensure_session → route`
//! and, for `/api/users/*`, `require_auth` right before the handler.

use crate::config::SESSION_COOKIE_NAME;
use crate::handlers::auth::{login, logout, register, session_info};
use crate::handlers::hash::hash_password;
use crate::handlers::health::health_check;
use crate::handlers::users::{delete_user, get_current_user, get_user, list_users, update_user};
use crate::middleware::{auth::require_auth, security_headers::security_headers, session::ensure_session};
use crate::state::AppState;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};

/// Build the application router
///
/// ## Public routes
/// - `GET /`: liveness
/// - `GET /hash`: hash the `password` header (demo only)
/// - `POST /api/auth/register`, `POST /api/auth/login`, `POST /api/auth/logout`
/// - `GET /api/auth/session`: whether the caller is logged in
///
/// ## Protected routes (behind `require_auth`)
/// - `GET /api/users`, `GET /api/users/me`
/// - `GET|PUT|DELETE /api/users/{id}`
pub fn build_router(state: AppState) -> Router {
    // A record lives `session_ttl_secs` from its last write. Reads alone
    // don't re-save it, so steady traffic doesn't stretch the lifespan.
    let session_layer = SessionManagerLayer::new(state.sessions.clone())
        .with_name(SESSION_COOKIE_NAME)
        .with_http_only(true)
        .with_secure(state.config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            state.config.session_ttl_secs,
        )))
        .with_signed(state.cookie_key.clone());

    // Any origin, method and header: the API is a demo backend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // route_layer: unmatched paths under /api/users still 404 instead of 401
    let protected_routes = Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(get_current_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(health_check))
        .route("/hash", get(hash_password))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session_info))
        .merge(protected_routes)
        // Layers run in reverse order: the last one added sees the request first
        .layer(from_fn(ensure_session))      // Issue a cookie to every visitor
        .layer(session_layer)                // Load/save the session record
        .layer(from_fn(security_headers))    // helmet-style response headers
        .layer(cors)                         // CORS headers
        .layer(TraceLayer::new_for_http())   // Request/response logging
        .with_state(state)
}
