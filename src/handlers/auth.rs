// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in and sign-out.

use crate::error::Result;
use crate::models::Identity;
use crate::EngineState;

use super::reported;

/// Sign in with an identity assertion and load that user's ratings.
///
/// A failed attempt changes nothing. On success any previous user's
/// in-memory ratings and imported history are dropped.
pub fn sign_in(state: &mut EngineState, assertion: &str) -> Result<Identity> {
    let outcome = state
        .session
        .sign_in(assertion, &state.tokens)
        .map(|session| session.identity.clone());
    let identity = reported(state, outcome)?;

    state.history.clear();
    let loaded = state.ratings.load(&identity.subject_id);
    tracing::info!(user_id = %identity.subject_id, ratings = loaded, "User signed in");

    state
        .notifier
        .success(format!("Welcome, {}!", identity.greeting_name()));
    Ok(identity)
}

/// Sign out, forgetting in-memory ratings and imported history.
///
/// Persisted ratings stay in storage for the next sign-in.
pub fn sign_out(state: &mut EngineState) -> Option<Identity> {
    let identity = end_session(state);
    state.notifier.success("Signed out successfully");
    identity
}

pub(crate) fn end_session(state: &mut EngineState) -> Option<Identity> {
    let identity = state.session.sign_out();
    state.ratings.clear_snapshot();
    state.history.clear();

    if let Some(identity) = &identity {
        tracing::info!(user_id = %identity.subject_id, "User signed out");
    }
    identity
}
