// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VideoRate: client-side state and policy engine for a video rating tool.
//!
//! The engine owns session state, consent, per-action rate limits, the
//! signed-in user's ratings and imported watch history. A UI collaborator
//! drives it through [`handlers`] and renders the notifications it emits.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::KeyValueStore;
use error::Result;
use services::{
    ConsentStore, HistoryImporter, Notifier, PrivacyPolicy, RateLimiter, RatingStore,
    SessionManager, SessionRevoker, TokenGenerator,
};

/// Engine context, owned by the UI and passed to every handler.
pub struct EngineState {
    pub config: Config,
    pub tokens: TokenGenerator,
    pub rate_limiter: RateLimiter,
    pub consent: ConsentStore,
    pub session: SessionManager,
    pub ratings: RatingStore,
    pub history: HistoryImporter,
    pub privacy: PrivacyPolicy,
    pub notifier: Notifier,
}

impl EngineState {
    /// Build a signed-out engine over `store`.
    ///
    /// A valid stored consent record is applied to the privacy flags.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let tokens = TokenGenerator::new();
        let session = SessionManager::new(&tokens)?;

        let mut privacy = PrivacyPolicy::new();
        let consent = ConsentStore::new(store.clone(), &config);
        if let Some(record) = consent.load() {
            privacy.apply_consent(&record);
        }

        Ok(Self {
            rate_limiter: RateLimiter::from_config(&config),
            ratings: RatingStore::new(store, &config),
            history: HistoryImporter::new(&config),
            notifier: Notifier::new(),
            config,
            tokens,
            consent,
            session,
            privacy,
        })
    }

    /// Replace the session revocation boundary.
    pub fn with_revoker(mut self, revoker: Box<dyn SessionRevoker>) -> Self {
        self.session = self.session.with_revoker(revoker);
        self
    }
}
