//! # User Queries
//!
//! CRUD operations on the `users` table. Lookups that find nothing return
//! `AppError::NotFound`, and a username collision returns `AppError::BadRequest`.

use crate::db::models::{NewUser, User, UserChanges};
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Insert a user and return the stored row (with its generated id).
///
/// ## Errors
/// - BadRequest: username already taken (UNIQUE constraint)
/// - Database: any other SQLite failure
pub async fn create_user(pool: &SqlitePool, new_user: &NewUser) -> AppResult<User> {
    let result = sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)")
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.role)
        .execute(pool)
        .await
        .map_err(|e| map_unique_violation(e, &new_user.username))?;

    find_by_id(pool, result.last_insert_rowid()).await
}

/// Look a user up by login name.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("User '{}' not found", username)),
            _ => AppError::Database(e),
        })?;

    Ok(user)
}

/// Look a user up by id. The guard uses this to check a session's user still exists.
pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("User with id '{}' not found", user_id)),
            _ => AppError::Database(e),
        })?;

    Ok(user)
}

/// All users, oldest first.
pub async fn list_users(pool: &SqlitePool) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(users)
}

/// Apply a partial update and return the updated row.
///
/// Columns whose `UserChanges` field is `None` keep their current value.
///
/// ## Errors
/// - NotFound: no user with this id
/// - BadRequest: the new username is taken
pub async fn update_user(pool: &SqlitePool, user_id: i64, changes: &UserChanges) -> AppResult<User> {
    // COALESCE keeps the current value for every column left as NULL
    let result = sqlx::query(
        "UPDATE users
         SET username = COALESCE(?, username),
             password_hash = COALESCE(?, password_hash),
             role = COALESCE(?, role)
         WHERE id = ?",
    )
    .bind(&changes.username)
    .bind(&changes.password_hash)
    .bind(&changes.role)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, changes.username.as_deref().unwrap_or_default()))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User with id '{}' not found", user_id)));
    }

    find_by_id(pool, user_id).await
}

/// Delete a user. NotFound if there was no such row.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User with id '{}' not found", user_id)));
    }

    Ok(())
}

fn map_unique_violation(e: sqlx::Error, username: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::BadRequest(format!("User '{}' already exists", username))
        }
        _ => AppError::Database(e),
    }
}
