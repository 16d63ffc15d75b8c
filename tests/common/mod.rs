// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::sync::Arc;
use videorate::config::Config;
use videorate::db::{KeyValueStore, MemoryStore};
use videorate::models::Identity;
use videorate::{handlers, EngineState};

/// Create a signed-out engine over a fresh in-memory store.
#[allow(dead_code)]
pub fn test_engine() -> EngineState {
    test_engine_with_store(Arc::new(MemoryStore::new()))
}

/// Create a signed-out engine over a shared store, e.g. to simulate a reload.
#[allow(dead_code)]
pub fn test_engine_with_store(store: Arc<dyn KeyValueStore>) -> EngineState {
    EngineState::new(Config::default(), store).expect("Failed to build engine")
}

/// Build an unsigned three-segment assertion carrying `claims`.
#[allow(dead_code)]
pub fn assertion(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

/// Sign in as `sub` and return the identity.
#[allow(dead_code)]
pub fn sign_in_as(state: &mut EngineState, sub: &str, name: &str) -> Identity {
    let token = assertion(serde_json::json!({
        "sub": sub,
        "name": name,
        "email": format!("{sub}@example.com"),
    }));
    handlers::auth::sign_in(state, &token).expect("Sign-in should succeed")
}
