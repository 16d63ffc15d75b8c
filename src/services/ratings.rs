// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rating store for the signed-in user.
//!
//! Holds an in-memory snapshot of one user's ratings and writes the whole
//! set back under `ratings_<user_id>` after every mutation. When a write
//! fails the snapshot stays authoritative for the rest of the session.

use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::config::Config;
use crate::db::{keys, KeyValueStore};
use crate::error::AppError;
use crate::models::rating::SOURCE_MANUAL_SEARCH;
use crate::models::{RatingRecord, RatingRequest, RatingStats};
use crate::services::tokens::TokenGenerator;
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};

/// Highest accepted rating.
const MAX_RATING: u8 = 10;

pub struct RatingStore {
    store: Arc<dyn KeyValueStore>,
    ttl: chrono::Duration,
    user_id: Option<String>,
    records: Vec<RatingRecord>,
}

impl RatingStore {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self {
            store,
            ttl: config.consent_ttl,
            user_id: None,
            records: Vec::new(),
        }
    }

    /// User whose ratings are currently loaded.
    pub fn loaded_user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Replace the snapshot with `user_id`'s persisted ratings.
    ///
    /// Unreadable data loads as an empty set. Records belonging to any other
    /// user or rated outside 0..=10 are discarded, and only the newest record
    /// per video is kept. Returns the number of ratings loaded.
    pub fn load(&mut self, user_id: &str) -> usize {
        self.user_id = Some(user_id.to_string());
        self.records = match self.store.get(&keys::ratings(user_id)) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<RatingRecord>>(&raw) {
                Ok(records) => Self::own_valid_records(records, user_id),
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "Unable to parse stored ratings");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Unable to load ratings");
                Vec::new()
            }
        };

        tracing::debug!(user_id, count = self.records.len(), "Ratings loaded");
        self.records.len()
    }

    fn own_valid_records(records: Vec<RatingRecord>, user_id: &str) -> Vec<RatingRecord> {
        let total = records.len();
        let own: Vec<RatingRecord> = records.into_iter().filter(|r| r.user_id == user_id).collect();
        if own.len() != total {
            tracing::warn!(
                user_id,
                dropped = total - own.len(),
                "Discarded ratings belonging to another user"
            );
        }

        let candidates = own.len();
        let mut kept: Vec<RatingRecord> = Vec::with_capacity(candidates);
        let mut by_video: HashMap<String, usize> = HashMap::new();
        for record in own.into_iter().filter(|r| r.rating <= MAX_RATING) {
            match by_video.get(&record.video_id) {
                Some(&i) => {
                    if parse_utc_rfc3339(&record.timestamp) > parse_utc_rfc3339(&kept[i].timestamp) {
                        kept[i] = record;
                    }
                }
                None => {
                    by_video.insert(record.video_id.clone(), kept.len());
                    kept.push(record);
                }
            }
        }

        if kept.len() != candidates {
            tracing::warn!(
                user_id,
                dropped = candidates - kept.len(),
                "Discarded out-of-range or duplicate ratings"
            );
        }
        kept
    }

    fn ensure_loaded_for(&self, user_id: &str) -> Result<(), AppError> {
        if self.user_id.as_deref() == Some(user_id) {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    fn persist(&self, user_id: &str, now: DateTime<Utc>) {
        let body = match serde_json::to_string(&self.records) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Unable to serialize ratings");
                return;
            }
        };

        if let Err(e) = self
            .store
            .set(&keys::ratings(user_id), &body, Some(now + self.ttl))
        {
            tracing::warn!(user_id, error = %e, "Unable to save ratings locally");
        }
    }

    /// Rate a video, or update the existing rating for it.
    ///
    /// Ratings outside 0..=10 are rejected, not clamped. An update keeps the
    /// record's id and replaces rating and timestamp.
    pub fn upsert(
        &mut self,
        user_id: &str,
        video_id: &str,
        rating: i64,
        tokens: &TokenGenerator,
        now: DateTime<Utc>,
    ) -> Result<RatingRecord, AppError> {
        self.ensure_loaded_for(user_id)?;

        let request = RatingRequest {
            video_id: video_id.trim().to_string(),
            rating,
        };
        request.validate().map_err(|e| {
            let message = if e.field_errors().contains_key("rating") {
                "Rating must be a whole number between 0 and 10"
            } else {
                "Invalid video id"
            };
            AppError::BadRequest(message.to_string())
        })?;

        let rating = u8::try_from(request.rating)
            .map_err(|_| AppError::BadRequest("Rating out of range".to_string()))?;
        let timestamp = format_utc_rfc3339(now);

        let record = match self
            .records
            .iter_mut()
            .find(|r| r.user_id == user_id && r.video_id == request.video_id)
        {
            Some(existing) => {
                existing.rating = rating;
                existing.timestamp = timestamp;
                existing.clone()
            }
            None => {
                let record = RatingRecord {
                    id: tokens.generate_rating_id(now)?,
                    user_id: user_id.to_string(),
                    video_id: request.video_id,
                    rating,
                    timestamp,
                    source: SOURCE_MANUAL_SEARCH.to_string(),
                };
                self.records.push(record.clone());
                record
            }
        };

        self.persist(user_id, now);
        tracing::info!(user_id, video_id = %record.video_id, rating, "Rating saved");
        Ok(record)
    }

    pub fn get_rating(&self, user_id: &str, video_id: &str) -> Option<u8> {
        if self.user_id.as_deref() != Some(user_id) {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.video_id == video_id)
            .map(|r| r.rating)
    }

    /// Delete every rating for the user and persist the empty set.
    ///
    /// Irreversible: callers must have obtained explicit confirmation.
    pub fn delete_all(&mut self, user_id: &str, now: DateTime<Utc>) -> Result<usize, AppError> {
        self.ensure_loaded_for(user_id)?;
        let removed = self.records.len();
        self.records.clear();
        self.persist(user_id, now);
        tracing::info!(user_id, removed, "All ratings deleted");
        Ok(removed)
    }

    /// Remove the user's persisted ratings entirely (account deletion).
    pub fn erase(&mut self, user_id: &str) {
        if let Err(e) = self.store.delete(&keys::ratings(user_id)) {
            tracing::warn!(user_id, error = %e, "Unable to erase stored ratings");
        }
        if self.user_id.as_deref() == Some(user_id) {
            self.clear_snapshot();
        }
    }

    /// Forget the in-memory snapshot. Persisted ratings are untouched.
    pub fn clear_snapshot(&mut self) {
        self.user_id = None;
        self.records.clear();
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    /// Ratings ordered newest first.
    pub fn recent_first(&self) -> Vec<&RatingRecord> {
        let mut sorted: Vec<&RatingRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| Reverse(parse_utc_rfc3339(&r.timestamp)));
        sorted
    }

    pub fn stats(&self) -> RatingStats {
        RatingStats::from_records(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use chrono::Duration;

    fn rating_store() -> (Arc<MemoryStore>, RatingStore) {
        let backing = Arc::new(MemoryStore::new());
        let store = RatingStore::new(backing.clone(), &Config::default());
        (backing, store)
    }

    #[test]
    fn test_repeat_rating_keeps_id() {
        let (_, mut store) = rating_store();
        let tokens = TokenGenerator::new();
        let t0 = Utc::now();
        store.load("u1");

        for rating in 0..=10 {
            let first = store.upsert("u1", "v1", rating, &tokens, t0).unwrap();
            let second = store
                .upsert("u1", "v1", 10 - rating, &tokens, t0 + Duration::seconds(5))
                .unwrap();

            assert_eq!(first.id, second.id);
            assert_eq!(second.rating as i64, 10 - rating);
            assert_ne!(first.timestamp, second.timestamp);
        }

        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let (_, mut store) = rating_store();
        let tokens = TokenGenerator::new();
        store.load("u1");

        for bad in [-1, 11, 255, i64::MAX] {
            let err = store.upsert("u1", "v1", bad, &tokens, Utc::now());
            assert!(matches!(err, Err(AppError::BadRequest(_))), "{bad}");
        }
        assert!(matches!(
            store.upsert("u1", "   ", 5, &tokens, Utc::now()),
            Err(AppError::BadRequest(_))
        ));
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_upsert_for_other_user_is_rejected() {
        let (_, mut store) = rating_store();
        let tokens = TokenGenerator::new();
        store.load("u1");

        let err = store.upsert("u2", "v1", 5, &tokens, Utc::now());
        assert!(matches!(err, Err(AppError::Unauthorized)));
        assert_eq!(store.get_rating("u2", "v1"), None);
    }

    #[test]
    fn test_persisted_set_reloads() {
        let (backing, mut store) = rating_store();
        let tokens = TokenGenerator::new();
        store.load("u1");
        store.upsert("u1", "v1", 7, &tokens, Utc::now()).unwrap();
        store.upsert("u1", "v2", 3, &tokens, Utc::now()).unwrap();

        let mut fresh = RatingStore::new(backing, &Config::default());
        assert_eq!(fresh.load("u1"), 2);
        assert_eq!(fresh.get_rating("u1", "v1"), Some(7));
        assert_eq!(fresh.get_rating("u1", "v2"), Some(3));
    }

    #[test]
    fn test_load_drops_foreign_records() {
        let (backing, mut store) = rating_store();
        let foreign = RatingRecord {
            id: "rating_1_abc".to_string(),
            user_id: "intruder".to_string(),
            video_id: "v9".to_string(),
            rating: 1,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            source: SOURCE_MANUAL_SEARCH.to_string(),
        };
        backing
            .set(
                &keys::ratings("u1"),
                &serde_json::to_string(&vec![foreign]).unwrap(),
                None,
            )
            .unwrap();

        assert_eq!(store.load("u1"), 0);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_load_drops_invalid_and_duplicate_records() {
        let (backing, mut store) = rating_store();
        let tokens = TokenGenerator::new();
        let stored = |id: &str, video_id: &str, rating: u8, timestamp: &str| RatingRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            video_id: video_id.to_string(),
            rating,
            timestamp: timestamp.to_string(),
            source: SOURCE_MANUAL_SEARCH.to_string(),
        };
        let records = vec![
            stored("a", "v1", 200, "2024-01-03T00:00:00.000Z"),
            stored("b", "v1", 3, "2024-01-01T00:00:00.000Z"),
            stored("c", "v2", 4, "2024-01-01T00:00:00.000Z"),
            stored("d", "v2", 6, "2024-01-02T00:00:00.000Z"),
        ];
        backing
            .set(
                &keys::ratings("u1"),
                &serde_json::to_string(&records).unwrap(),
                None,
            )
            .unwrap();

        assert_eq!(store.load("u1"), 2);
        assert_eq!(store.get_rating("u1", "v1"), Some(3));
        assert_eq!(store.get_rating("u1", "v2"), Some(6));

        let updated = store.upsert("u1", "v1", 5, &tokens, Utc::now()).unwrap();
        assert_eq!(updated.id, "b");
        let ids: Vec<(&str, u8)> = store
            .records()
            .iter()
            .map(|r| (r.id.as_str(), r.rating))
            .collect();
        assert_eq!(ids, vec![("b", 5), ("d", 6)]);
    }

    #[test]
    fn test_corrupt_ratings_load_empty() {
        let (backing, mut store) = rating_store();
        backing.set(&keys::ratings("u1"), "[{oops", None).unwrap();
        assert_eq!(store.load("u1"), 0);
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let mut store = RatingStore::new(Arc::new(MemoryStore::new_offline()), &Config::default());
        let tokens = TokenGenerator::new();
        assert_eq!(store.load("u1"), 0);

        store.upsert("u1", "v1", 9, &tokens, Utc::now()).unwrap();
        assert_eq!(store.get_rating("u1", "v1"), Some(9));
    }

    #[test]
    fn test_delete_all_and_erase() {
        let (backing, mut store) = rating_store();
        let tokens = TokenGenerator::new();
        store.load("u1");
        store.upsert("u1", "v1", 7, &tokens, Utc::now()).unwrap();
        store.upsert("u1", "v2", 8, &tokens, Utc::now()).unwrap();

        assert_eq!(store.delete_all("u1", Utc::now()).unwrap(), 2);
        assert!(store.records().is_empty());
        assert_eq!(
            backing.get(&keys::ratings("u1")).unwrap().as_deref(),
            Some("[]")
        );

        store.upsert("u1", "v3", 1, &tokens, Utc::now()).unwrap();
        store.erase("u1");
        assert_eq!(backing.get(&keys::ratings("u1")).unwrap(), None);
        assert_eq!(store.loaded_user(), None);
    }

    #[test]
    fn test_recent_first_and_stats() {
        let (_, mut store) = rating_store();
        let tokens = TokenGenerator::new();
        let t0 = Utc::now();
        store.load("u1");
        store.upsert("u1", "old", 4, &tokens, t0).unwrap();
        store
            .upsert("u1", "new", 9, &tokens, t0 + Duration::minutes(1))
            .unwrap();

        let order: Vec<&str> = store
            .recent_first()
            .iter()
            .map(|r| r.video_id.as_str())
            .collect();
        assert_eq!(order, vec!["new", "old"]);

        let stats = store.stats();
        assert_eq!(stats.total, 2);
        assert!((stats.average - 6.5).abs() < f64::EPSILON);
    }
}
