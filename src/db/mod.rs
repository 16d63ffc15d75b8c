//! Persistence boundary: a key-value store with per-key expiry.
//!
//! The engine only needs `get`, `set` and `delete`; backends decide where the
//! values live. Values are opaque strings (the engine stores JSON).

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// Storage keys as constants.
pub mod keys {
    pub const CONSENT: &str = "consent";

    /// Per-user ratings key.
    pub fn ratings(user_id: &str) -> String {
        format!("ratings_{}", user_id)
    }
}

/// Key-value store with optional expiry per key.
///
/// A value whose expiry has passed must read back as absent. Writing with an
/// expiry in the past is a removal.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(
        &self,
        key: &str,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>;

    fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub(crate) fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|at| at <= now)
}
