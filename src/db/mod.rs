//! # Database Module
//!
//! - `models`: Data structures (User and its insert/update shapes)
//! - `users`: CRUD operations for users
//!
//! The `users` table comes from the embedded migrations in `./migrations`.
//! The `sessions` table is owned by the session store (see `crate::session`).

pub mod models;
pub mod users;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Open the connection pool and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePool::connect(database_url).await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database, used by tests.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
