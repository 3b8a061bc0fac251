//! # Configuration Management
//!
//! This module handles loading configuration from environment variables.
//! It uses the "12-factor app" methodology where configuration comes from the environment.
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 5000)
//! - `DATABASE_URL`: SQLite database connection string
//! - `HASH_ROUNDS`: bcrypt work factor, 2^n rounds (default: 8)
//! - `COOKIE_SECURE`: Only send the session cookie over HTTPS (default: false)
//! - `SESSION_TTL_SECS`: Session cookie lifespan in seconds (default: 600)
//! - `SESSION_SWEEP_SECS`: How often expired sessions are deleted (default: 3600)
//! - `SESSION_SECRET`: Secret used to sign the session cookie (default: random per process)

use crate::password::{MAX_COST, MIN_COST};
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

/// Name of the session cookie handed to clients.
pub const SESSION_COOKIE_NAME: &str = "monster";

/// Application configuration
///
/// Holds every value needed to run the server. All fields are public so
/// tests can build a `Config` directly instead of going through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    /// Examples: "127.0.0.1" (localhost only), "0.0.0.0" (all interfaces)
    pub host: String,

    /// Server port number (1-65535)
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.db?mode=rwc"
    /// The "mode=rwc" means: read, write, create if not exists
    pub database_url: String,

    /// bcrypt cost. Each increment doubles the hashing work.
    pub hash_rounds: u32,

    /// Sets the `Secure` attribute on the session cookie
    pub cookie_secure: bool,

    /// Lifespan of a session (and its cookie) in seconds
    pub session_ttl_secs: i64,

    /// Interval between expired-session sweeps, in seconds
    pub session_sweep_secs: u64,

    /// Cookie signing secret. `None` means a random key is generated at startup,
    /// so sessions do not survive a restart.
    pub session_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file first if one exists (dotenvy doesn't error when it is
    /// missing), then reads every value through [`Config::from_lookup`].
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=5000
    /// DATABASE_URL=sqlite:monster.db?mode=rwc
    /// HASH_ROUNDS=8
    /// COOKIE_SECURE=false
    /// SESSION_SECRET=keep it secret, keep it safe!
    /// ```
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Missing keys fall back to defaults. Present but unparsable values are
    /// an error rather than being silently replaced.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hash_rounds: u32 = parse_or(&lookup, "HASH_ROUNDS", 8)?;
        if !(MIN_COST..=MAX_COST).contains(&hash_rounds) {
            bail!(
                "HASH_ROUNDS must be between {} and {}, got {}",
                MIN_COST,
                MAX_COST,
                hash_rounds
            );
        }

        let session_ttl_secs: i64 = parse_or(&lookup, "SESSION_TTL_SECS", 600)?;
        if session_ttl_secs <= 0 {
            bail!("SESSION_TTL_SECS must be positive, got {}", session_ttl_secs);
        }

        let session_sweep_secs: u64 = parse_or(&lookup, "SESSION_SWEEP_SECS", 3600)?;
        if session_sweep_secs == 0 {
            bail!("SESSION_SWEEP_SECS must be positive");
        }

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:monster.db?mode=rwc".to_string()),
            hash_rounds,
            cookie_secure: lookup("COOKIE_SECURE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            session_ttl_secs,
            session_sweep_secs,
            session_secret: lookup("SESSION_SECRET").filter(|s| !s.is_empty()),
        })
    }

    /// Get the socket address to bind the server to
    ///
    /// Example: "127.0.0.1:5000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("defaults should load");

        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.hash_rounds, 8);
        assert!(!config.cookie_secure);
        assert_eq!(config.session_ttl_secs, 600);
        assert_eq!(config.session_sweep_secs, 3600);
        assert!(config.session_secret.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("HASH_ROUNDS", "10"),
            ("COOKIE_SECURE", "TRUE"),
            ("SESSION_SECRET", "keep it secret, keep it safe!"),
        ])
        .expect("overrides should load");

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.hash_rounds, 10);
        assert!(config.cookie_secure);
        assert_eq!(
            config.session_secret.as_deref(),
            Some("keep it secret, keep it safe!")
        );
    }

    #[test]
    fn test_cookie_secure_flag_values() {
        for raw in ["1", "yes", "on", " true "] {
            assert!(config_from(&[("COOKIE_SECURE", raw)]).unwrap().cookie_secure, "{raw}");
        }
        for raw in ["0", "false", "no", ""] {
            assert!(!config_from(&[("COOKIE_SECURE", raw)]).unwrap().cookie_secure, "{raw}");
        }
    }

    #[test]
    fn test_hash_rounds_out_of_range() {
        assert!(config_from(&[("HASH_ROUNDS", "3")]).is_err());
        assert!(config_from(&[("HASH_ROUNDS", "32")]).is_err());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("HASH_ROUNDS", "eight")]).is_err());
        assert!(config_from(&[("SESSION_TTL_SECS", "0")]).is_err());
        assert!(config_from(&[("SESSION_SWEEP_SECS", "0")]).is_err());
    }

    #[test]
    fn test_empty_secret_is_ignored() {
        let config = config_from(&[("SESSION_SECRET", "")]).unwrap();
        assert!(config.session_secret.is_none());
    }
}
