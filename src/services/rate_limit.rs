// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-(action, actor) fixed-window rate limiting.
//!
//! Each window admits `max` actions and resets once it has passed. A burst
//! at the end of one window followed by a burst at the start of the next can
//! therefore admit up to `2 * max` actions in a short span; this is the
//! accepted behaviour of a fixed window, not something to smooth over here.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::config::Config;

/// Actor key shared by every caller that is not signed in.
pub const ANONYMOUS_ACTOR: &str = "anonymous";

/// Action names used by the engine's entry points.
pub mod actions {
    pub const SEARCH: &str = "search";
    pub const RATING: &str = "rating";
    pub const IMPORT: &str = "import";
    pub const PRIVACY: &str = "privacy";
}

/// Counter state for one (action, actor) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: Instant,
}

type RateLimitKey = (String, String);

/// Fixed-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    entries: DashMap<RateLimitKey, RateLimitEntry>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            entries: DashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_max, config.rate_limit_window)
    }

    fn key(action: &str, actor: Option<&str>) -> RateLimitKey {
        (
            action.to_string(),
            actor.unwrap_or(ANONYMOUS_ACTOR).to_string(),
        )
    }

    /// Consume one unit of quota if available. Returns whether the action
    /// may proceed.
    pub fn check_and_consume(&self, action: &str, actor: Option<&str>) -> bool {
        self.check_and_consume_at(action, actor, Instant::now())
    }

    /// [`check_and_consume`](Self::check_and_consume) at an explicit instant.
    pub fn check_and_consume_at(&self, action: &str, actor: Option<&str>, now: Instant) -> bool {
        // The entry guard holds the shard lock for the whole read-modify-write.
        let mut entry = self
            .entries
            .entry(Self::key(action, actor))
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                window_reset_at: now + self.window,
            });

        if now > entry.window_reset_at {
            entry.count = 0;
            entry.window_reset_at = now + self.window;
        }

        if entry.count >= self.max {
            tracing::debug!(
                action,
                actor = actor.unwrap_or(ANONYMOUS_ACTOR),
                count = entry.count,
                "Rate limit reached"
            );
            return false;
        }

        entry.count += 1;
        true
    }

    /// Actions still allowed in the current window.
    pub fn remaining(&self, action: &str, actor: Option<&str>, now: Instant) -> u32 {
        match self.entries.get(&Self::key(action, actor)) {
            Some(entry) if now <= entry.window_reset_at => self.max.saturating_sub(entry.count),
            _ => self.max,
        }
    }

    /// Current counter state, if the pair has been seen.
    pub fn entry(&self, action: &str, actor: Option<&str>) -> Option<RateLimitEntry> {
        self.entries.get(&Self::key(action, actor)).map(|e| *e)
    }

    /// Drop entries whose window has closed. Returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.window_reset_at);
        before - self.entries.len()
    }
}
