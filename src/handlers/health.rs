//! # Health Check Handler
//!
//! Simple endpoint to check if the server is running.

use axum::Json;
use serde_json::{json, Value};

/// Liveness endpoint
///
/// ## Route
/// GET /
///
/// ## Response
/// ```json
/// { "api": "up" }
/// ```
///
/// Never fails, so it returns `Json<Value>` directly instead of `AppResult`.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "api": "up" }))
}
