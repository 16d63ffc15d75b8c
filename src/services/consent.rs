// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consent persistence.
//!
//! Consent UX must never take the engine down: reads fail soft to "no
//! consent yet" and write failures are logged and swallowed.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::Config;
use crate::db::{keys, KeyValueStore};
use crate::models::{ConsentRecord, ConsentSettings};

pub struct ConsentStore {
    store: Arc<dyn KeyValueStore>,
    ttl: chrono::Duration,
}

impl ConsentStore {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self {
            store,
            ttl: config.consent_ttl,
        }
    }

    /// Load the stored record. Any read or parse problem yields `None`.
    pub fn load(&self) -> Option<ConsentRecord> {
        let raw = match self.store.get(keys::CONSENT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read consent");
                return None;
            }
        };

        match serde_json::from_str::<ConsentRecord>(&raw) {
            Ok(record) if record.is_valid() => Some(record),
            Ok(_) => {
                tracing::warn!("Stored consent lacks essential consent, ignoring");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored consent is not valid JSON, ignoring");
                None
            }
        }
    }

    /// Persist a record, expiring one consent lifetime from now.
    pub fn save(&self, record: &ConsentRecord) {
        self.save_at(record, Utc::now());
    }

    pub fn save_at(&self, record: &ConsentRecord, now: DateTime<Utc>) {
        let body = match serde_json::to_string(record) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize consent");
                return;
            }
        };

        if let Err(e) = self.store.set(keys::CONSENT, &body, Some(now + self.ttl)) {
            tracing::warn!(error = %e, "Could not store consent");
        }
    }

    /// Remove the record with an immediately-expiring write.
    pub fn clear(&self) {
        let expired = DateTime::<Utc>::UNIX_EPOCH;
        if let Err(e) = self.store.set(keys::CONSENT, "", Some(expired)) {
            tracing::warn!(error = %e, "Could not clear consent");
        }
    }

    /// Replace only the `settings` of the stored record.
    ///
    /// Returns `false` when there is no record to update.
    pub fn merge_settings(&self, settings: ConsentSettings) -> bool {
        let Some(mut record) = self.load() else {
            return false;
        };

        record.settings = settings;
        self.save(&record);
        true
    }
}
