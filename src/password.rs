//! # Password Hashing
//!
//! Salted password hashing and verification using bcrypt.
//!
//! - Every hash carries its own random salt and cost, in modular-crypt format
//!   (`$2b$08$<22-char salt><31-char hash>`, always 60 characters)
//! - The cost is the base-2 logarithm of the number of rounds, so each
//!   increment doubles the work
//! - Comparison is constant-time inside the bcrypt crate
//!
//! bcrypt only looks at the first 72 bytes of its input. Longer inputs are
//! rejected here instead of being silently truncated, otherwise two different
//! passwords sharing a 72-byte prefix would verify against each other.

use thiserror::Error;

/// Smallest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Largest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Longest plaintext, in bytes, that bcrypt fully consumes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Error, Debug)]
pub enum PasswordError {
    /// No plaintext was supplied at all
    #[error("Illegal arguments: password is required")]
    MissingInput,

    #[error("Password exceeds {} bytes", MAX_PASSWORD_BYTES)]
    TooLong,

    /// Raised by the bcrypt crate: invalid cost, malformed hash, ...
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),

    /// The blocking hashing task panicked or was cancelled
    #[error("Hashing task failed: {0}")]
    Task(String),
}

/// Hash a plaintext password with the given cost.
///
/// # Errors
///
/// - [`PasswordError::TooLong`] if `plaintext` is longer than 72 bytes
/// - [`PasswordError::Bcrypt`] if `cost` is outside `4..=31`
///
/// # Example
///
/// ```ignore
/// let hash = hash_password("sam", 8)?;
/// assert!(hash.starts_with("$2b$08$"));
/// ```
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, PasswordError> {
    check_length(plaintext)?;
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Check a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on a mismatch. A stored hash that cannot be parsed is
/// an error, never a silent `false`.
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        // Nothing this long was ever hashed by `hash_password`
        return Ok(false);
    }
    Ok(bcrypt::verify(plaintext, hash)?)
}

/// Hash on the blocking thread pool so the async runtime keeps serving
/// other requests while bcrypt burns CPU.
pub async fn hash_password_blocking(plaintext: String, cost: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext, cost))
        .await
        .unwrap_or_else(|e| Err(PasswordError::Task(e.to_string())))
}

/// Blocking-pool counterpart of [`verify_password`].
pub async fn verify_password_blocking(plaintext: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&plaintext, &hash))
        .await
        .unwrap_or_else(|e| Err(PasswordError::Task(e.to_string())))
}

fn check_length(plaintext: &str) -> Result<(), PasswordError> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}
