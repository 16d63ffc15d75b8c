// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry points called by the UI.
//!
//! Each handler runs its guards, calls the engine components and routes the
//! outcome through the notifier. Errors are both notified and returned.

pub mod account;
pub mod auth;
pub mod consent;
pub mod history;
pub mod ratings;
pub mod search;

use crate::error::Result;
use crate::EngineState;

/// Push the notification for a failed outcome and hand the outcome back.
fn reported<T>(state: &mut EngineState, outcome: Result<T>) -> Result<T> {
    outcome.map_err(|err| {
        state.notifier.push(err.to_notification());
        err
    })
}
