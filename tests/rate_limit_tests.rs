// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-action quotas as seen through the handlers.

mod common;

use common::{sign_in_as, test_engine};
use std::sync::Arc;
use std::time::{Duration, Instant};
use videorate::config::Config;
use videorate::db::MemoryStore;
use videorate::error::AppError;
use videorate::EngineState;
use videorate::handlers;
use videorate::services::rate_limit::actions;
use videorate::services::{RateLimiter, Severity};

#[test]
fn test_search_quota_per_user() {
    let limiter = RateLimiter::new(10, Duration::from_secs(60));
    let start = Instant::now();

    for i in 0..10 {
        assert!(
            limiter.check_and_consume_at(actions::SEARCH, Some("u1"), start + Duration::from_secs(i)),
            "call {} should be allowed",
            i + 1
        );
    }
    assert!(!limiter.check_and_consume_at(actions::SEARCH, Some("u1"), start + Duration::from_secs(30)));
    assert!(limiter.check_and_consume_at(actions::SEARCH, Some("u1"), start + Duration::from_secs(61)));
}

#[test]
fn test_search_handler_refuses_eleventh() {
    let mut state = test_engine();
    sign_in_as(&mut state, "u1", "A");
    state.notifier.drain();

    for _ in 0..10 {
        assert_eq!(
            handlers::search::authorize_search(&mut state, "  Rust <script>x</script>TALKS ").unwrap(),
            "rust talks"
        );
    }

    let err = handlers::search::authorize_search(&mut state, "rust").unwrap_err();
    assert!(matches!(err, AppError::RateLimited { .. }));

    let notifications = state.notifier.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Warning);
    assert_eq!(
        notifications[0].message,
        "Rate limit exceeded. Please wait before searching again."
    );
}

#[test]
fn test_signed_out_searches_share_anonymous_bucket() {
    let mut state = test_engine();
    for _ in 0..10 {
        handlers::search::authorize_search(&mut state, "q").unwrap();
    }
    assert!(handlers::search::authorize_search(&mut state, "q").is_err());

    // A signed-in user has a separate bucket.
    sign_in_as(&mut state, "u1", "A");
    assert!(handlers::search::authorize_search(&mut state, "q").is_ok());
}

#[test]
fn test_rating_quota_is_separate_from_search() {
    let mut state = test_engine();
    sign_in_as(&mut state, "u1", "A");

    for i in 0..10 {
        handlers::search::authorize_search(&mut state, "q").unwrap();
        handlers::ratings::rate_video(&mut state, &format!("v{i}"), 5).unwrap();
    }

    let err = handlers::ratings::rate_video(&mut state, "v10", 5).unwrap_err();
    assert!(matches!(err, AppError::RateLimited { ref action } if action == "rating"));
    assert_eq!(handlers::ratings::get_rating(&state, "v10"), None);
    assert_eq!(
        state.notifier.drain().last().unwrap().message,
        "Rate limit exceeded. Please wait before rating again."
    );
}

#[test]
fn test_expired_buckets_are_pruned() {
    let config = Config {
        rate_limit_window: Duration::from_millis(50),
        ..Config::default()
    };
    let mut state = EngineState::new(config, Arc::new(MemoryStore::new())).unwrap();

    handlers::search::authorize_search(&mut state, "q").unwrap();
    sign_in_as(&mut state, "u1", "A");
    handlers::ratings::rate_video(&mut state, "v1", 5).unwrap();
    assert!(state.rate_limiter.entry(actions::SEARCH, None).is_some());
    assert!(state.rate_limiter.entry(actions::RATING, Some("u1")).is_some());

    std::thread::sleep(Duration::from_millis(120));
    handlers::search::authorize_search(&mut state, "q").unwrap();

    assert!(state.rate_limiter.entry(actions::SEARCH, None).is_none());
    assert!(state.rate_limiter.entry(actions::RATING, Some("u1")).is_none());
    assert_eq!(
        state.rate_limiter.entry(actions::SEARCH, Some("u1")).unwrap().count,
        1
    );
}
