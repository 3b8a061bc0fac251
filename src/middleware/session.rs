//! Session bootstrap middleware.
//!
//! Runs inside the session manager layer, so the `Session` it extracts is the
//! one that will be saved when the response goes out.

use crate::error::AppError;
use crate::session::ISSUED_AT_KEY;
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

/// Persist a session for every visitor, even anonymous ones.
///
/// tower-sessions only saves (and sends a cookie for) modified sessions.
/// Stamping `issued_at` on a session that doesn't have one yet marks it
/// modified, so a request without a valid cookie always gets a fresh one.
pub async fn ensure_session(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if session.get::<i64>(ISSUED_AT_KEY).await?.is_none() {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        session.insert(ISSUED_AT_KEY, now).await?;
    }

    Ok(next.run(request).await)
}
