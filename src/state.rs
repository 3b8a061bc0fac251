//! # Application State
//!
//! The server context: everything handlers share, built once at startup and
//! handed to them through axum's `State` extractor. Nothing lives in globals.

use crate::config::Config;
use crate::{db, session};
use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tower_sessions::cookie::Key;
use tower_sessions_sqlx_store::SqliteStore;

/// Shared application state
///
/// Cloned for every request. Each field is either a handle (`SqlitePool`,
/// `SqliteStore` wraps the same pool) or behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (users table and sessions table)
    pub db: SqlitePool,

    /// Session store backed by the `sessions` table
    pub sessions: SqliteStore,

    /// Key signing the session cookie
    pub cookie_key: Key,

    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to the configured database, run migrations and create the
    /// session table.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::connect(&config.database_url).await?;
        Self::from_pool(pool, config.clone()).await
    }

    /// Build the state around an already-migrated pool.
    pub async fn from_pool(db: SqlitePool, config: Config) -> Result<Self> {
        let sessions = session::build_store(db.clone()).await?;
        let cookie_key = session::signing_key(&config);

        Ok(AppState {
            db,
            sessions,
            cookie_key,
            config: Arc::new(config),
        })
    }
}
