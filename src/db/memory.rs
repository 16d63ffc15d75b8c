// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory key-value store.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::{is_expired, KeyValueStore};
use crate::error::AppError;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Key-value store held in memory for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Option<DashMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Some(DashMap::new()),
        }
    }

    /// Create a store that rejects every operation.
    ///
    /// Stands in for a storage medium that refuses reads and writes.
    pub fn new_offline() -> Self {
        Self { entries: None }
    }

    fn entries(&self) -> Result<&DashMap<String, StoredValue>, AppError> {
        self.entries
            .as_ref()
            .ok_or_else(|| AppError::Storage("Storage unavailable (offline mode)".to_string()))
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .as_ref()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| !is_expired(e.expires_at, now))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries()?;
        let now = Utc::now();

        // Drop the read guard before removing.
        let expired = match entries.get(key) {
            None => return Ok(None),
            Some(stored) if !is_expired(stored.expires_at, now) => {
                return Ok(Some(stored.value.clone()))
            }
            Some(_) => true,
        };

        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(
        &self,
        key: &str,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let entries = self.entries()?;

        if is_expired(expires_at, Utc::now()) {
            entries.remove(key);
            return Ok(());
        }

        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
