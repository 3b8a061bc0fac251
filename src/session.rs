//! # Sessions
//!
//! Server-side sessions keyed by a signed cookie.
//!
//! ## Lifecycle
//! - **no session → anonymous**: a request without a valid, unexpired cookie
//!   gets a fresh record (see `middleware::session::ensure_session`)
//! - **anonymous → authenticated**: login rotates the id and stores `user_id`
//! - **authenticated → no session**: logout flushes the record and the cookie
//! - **any → expired**: the store refuses to load records past their expiry,
//!   and [`spawn_expiry_sweep`] deletes them on a fixed interval
//!
//! The session payload is a small key/value map. Only two keys are used:
//! [`USER_ID_KEY`] and [`ISSUED_AT_KEY`].

use crate::config::Config;
use crate::error::AppResult;
use anyhow::Result;
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_sessions::cookie::Key;
use tower_sessions::{ExpiredDeletion, Session};
use tower_sessions_sqlx_store::SqliteStore;

/// Table holding session records (`id`, `data`, `expiry_date`).
pub const SESSION_TABLE: &str = "sessions";

/// Key for storing the authenticated user's id in the session.
pub const USER_ID_KEY: &str = "user_id";

/// Unix timestamp of the first request that created the session. Stamping it
/// is what makes an anonymous session get persisted and its cookie issued.
pub const ISSUED_AT_KEY: &str = "issued_at";

/// Create the SQLite session store, creating its table if absent.
pub async fn build_store(pool: SqlitePool) -> Result<SqliteStore> {
    let store = SqliteStore::new(pool)
        .with_table_name(SESSION_TABLE)
        .map_err(|e| anyhow::anyhow!("invalid session table name: {}", e))?;
    store.migrate().await?;
    Ok(store)
}

/// Key used to sign the session cookie.
///
/// The configured secret is stretched to the 64 bytes the cookie crate needs
/// with SHA-512. Without a secret, a random key is generated, so cookies stop
/// validating after a restart.
pub fn signing_key(config: &Config) -> Key {
    match &config.session_secret {
        Some(secret) => {
            let digest = Sha512::digest(secret.as_bytes());
            Key::from(digest.as_slice())
        }
        None => {
            tracing::warn!("SESSION_SECRET not set, using a random cookie signing key");
            Key::generate()
        }
    }
}

/// Delete every expired session once.
pub async fn sweep_expired(store: &SqliteStore) -> AppResult<()> {
    store
        .delete_expired()
        .await
        .map_err(|e| crate::error::AppError::Internal(format!("Session sweep failed: {}", e)))
}

/// Run [`sweep_expired`] forever on a fixed interval, independent of traffic.
pub fn spawn_expiry_sweep(store: SqliteStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            tracing::debug!("Running expired session sweep");
            if let Err(e) = sweep_expired(&store).await {
                tracing::error!("{}", e);
            }
        }
    })
}

/// User id attached to the session, if the visitor has logged in.
pub async fn current_user_id(session: &Session) -> AppResult<Option<i64>> {
    Ok(session.get::<i64>(USER_ID_KEY).await?)
}

/// Promote the session to an authenticated one.
///
/// The id is cycled first so a session id planted before login can't be
/// reused afterwards.
pub async fn attach_user(session: &Session, user_id: i64) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    Ok(())
}
