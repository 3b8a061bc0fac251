//! # monster-auth server
//!
//! Entry point: logging, configuration, state, the session sweep task and
//! the HTTP listener.

use monster_auth::{build_router, session, AppState, Config};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default: info level for most crates, debug level for our app.
    // Can be overridden with the RUST_LOG environment variable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,monster_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database_url = %config.database_url,
        hash_rounds = config.hash_rounds,
        cookie_secure = config.cookie_secure,
        session_ttl_secs = config.session_ttl_secs,
        "Configuration loaded"
    );

    // Connects the pool, runs migrations, creates the sessions table
    let app_state = AppState::new(&config).await?;
    tracing::info!("Application state initialized");

    // Expired sessions are deleted on a fixed timer, whatever the traffic
    session::spawn_expiry_sweep(
        app_state.sessions.clone(),
        Duration::from_secs(config.session_sweep_secs),
    );

    let app = build_router(app_state);

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
