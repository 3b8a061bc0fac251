use crate::db::users;
use crate::error::AppError;
use crate::session;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

/// Protected-route guard
///
/// Passes only sessions with a `user_id` attached whose user row still exists.
/// Anonymous sessions, and expired ones (which the store no longer loads, so
/// they look empty), get a 401.
///
/// A session pointing at a deleted account is flushed on the spot, so the
/// record and cookie go away instead of lingering until the TTL runs out.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user_id) = session::current_user_id(&session).await? else {
        tracing::debug!("Rejected unauthenticated request to {}", request.uri().path());
        return Err(AppError::Unauthorized("Not authenticated".to_string()));
    };

    match users::find_by_id(&state.db, user_id).await {
        Ok(_) => Ok(next.run(request).await),
        Err(AppError::NotFound(_)) => {
            tracing::info!(user_id, "Session belongs to a deleted user, flushing it");
            session.flush().await?;
            Err(AppError::Unauthorized("Not authenticated".to_string()))
        }
        Err(e) => Err(e),
    }
}
