//! Engine configuration loaded from environment variables.
//!
//! Every setting has a default matching the shipped policy (10 actions per
//! minute, 100 imported entries, 10 MiB uploads, one-year consent), so an
//! empty environment yields a working engine.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the durable key-value store (console binary only)
    pub data_dir: PathBuf,
    /// Actions allowed per window for each (action, actor) pair
    pub rate_limit_max: u32,
    /// Fixed rate-limit window length
    pub rate_limit_window: Duration,
    /// Entries taken from a bulk history payload; the rest are dropped
    pub max_import_items: usize,
    /// Largest accepted history upload
    pub max_upload_bytes: u64,
    /// Lifetime of persisted consent and ratings
    pub consent_ttl: chrono::Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".videorate"),
            rate_limit_max: 10,
            rate_limit_window: Duration::from_secs(60),
            max_import_items: 100,
            max_upload_bytes: 10 * 1024 * 1024,
            consent_ttl: chrono::Duration::days(365),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unparsable values fall back to the defaults; values that parse but
    /// would disable a limit entirely are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let rate_limit_max = env::var("VIDEORATE_RATE_LIMIT")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.rate_limit_max);
        if rate_limit_max == 0 {
            return Err(ConfigError::Invalid("VIDEORATE_RATE_LIMIT", "must be at least 1"));
        }

        let window_secs: u64 = env::var("VIDEORATE_RATE_WINDOW_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.rate_limit_window.as_secs());
        if window_secs == 0 {
            return Err(ConfigError::Invalid(
                "VIDEORATE_RATE_WINDOW_SECS",
                "must be at least 1",
            ));
        }

        let max_import_items = env::var("VIDEORATE_MAX_IMPORT_ITEMS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.max_import_items);
        if max_import_items == 0 {
            return Err(ConfigError::Invalid(
                "VIDEORATE_MAX_IMPORT_ITEMS",
                "must be at least 1",
            ));
        }

        let consent_days: i64 = env::var("VIDEORATE_CONSENT_TTL_DAYS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(365);
        if consent_days <= 0 {
            return Err(ConfigError::Invalid(
                "VIDEORATE_CONSENT_TTL_DAYS",
                "must be positive",
            ));
        }

        let max_upload_bytes = env::var("VIDEORATE_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.max_upload_bytes);
        if max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "VIDEORATE_MAX_UPLOAD_BYTES",
                "must be at least 1",
            ));
        }

        Ok(Self {
            data_dir: env::var("VIDEORATE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            rate_limit_max,
            rate_limit_window: Duration::from_secs(window_secs),
            max_import_items,
            max_upload_bytes,
            consent_ttl: chrono::Duration::days(consent_days),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
