// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value store backed by one JSON file per key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{is_expired, KeyValueStore};
use crate::error::AppError;
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};

/// On-disk envelope for a single value.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
}

/// File-backed key-value store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        tracing::debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// Keys may contain any characters; encode them so each maps to exactly
    /// one file inside the data directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let safe_name = urlencoding::encode(key);
        self.dir.join(format!("{}.json", safe_name))
    }

    fn remove_file(path: &Path) -> Result<(), AppError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let envelope: Envelope = serde_json::from_str(&raw)
            .map_err(|e| AppError::Storage(format!("Corrupt entry for '{}': {}", key, e)))?;

        let expires_at = envelope.expires_at.as_deref().and_then(parse_utc_rfc3339);
        if is_expired(expires_at, Utc::now()) {
            Self::remove_file(&path)?;
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }

    fn set(
        &self,
        key: &str,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError> {
        let path = self.path_for(key);

        if is_expired(expires_at, Utc::now()) {
            return Self::remove_file(&path);
        }

        let envelope = Envelope {
            value: value.to_string(),
            expires_at: expires_at.map(format_utc_rfc3339),
        };
        let body = serde_json::to_string(&envelope)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Envelope serialization: {}", e)))?;

        // Write then rename so a crash never leaves a half-written value.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn delete(&self, key: &str) -> Result<(), AppError> {
        Self::remove_file(&self.path_for(key))
    }
}
