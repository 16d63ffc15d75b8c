// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication guard.

use crate::error::AppError;
use crate::EngineState;

/// Authenticated user resolved from the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

/// Guard that requires a signed-in session.
pub fn require_auth(state: &EngineState) -> Result<AuthUser, AppError> {
    let identity = state.session.identity().ok_or(AppError::Unauthorized)?;

    Ok(AuthUser {
        user_id: identity.subject_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_signed_out_is_rejected() {
        let state = EngineState::new(Config::default(), Arc::new(MemoryStore::new())).unwrap();
        assert!(matches!(require_auth(&state), Err(AppError::Unauthorized)));
    }
}
