// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Privacy settings, data export and account deletion.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::middleware::{enforce_rate_limit, require_auth};
use crate::models::{PrivacyFlag, PrivacySettings, UserDataExport};
use crate::services::rate_limit::actions;
use crate::time_utils::format_utc_rfc3339;
use crate::EngineState;

use super::auth::end_session;
use super::reported;

// ─── Privacy ─────────────────────────────────────────────────

/// Change one privacy flag by name. `"essential"` is rejected.
///
/// Returns the updated settings.
pub fn set_privacy_flag(state: &mut EngineState, flag: &str, value: bool) -> Result<PrivacySettings> {
    let outcome = require_auth(state)
        .and_then(|_| enforce_rate_limit(state, actions::PRIVACY))
        .and_then(|()| flag.parse::<PrivacyFlag>());
    let flag = reported(state, outcome)?;

    state.privacy.set_flag(flag, value, &state.consent);
    state.notifier.success("Privacy settings updated");
    Ok(state.privacy.settings())
}

// ─── Export ──────────────────────────────────────────────────

/// Snapshot everything held for the signed-in user.
pub fn export_user_data(state: &mut EngineState) -> Result<UserDataExport> {
    let outcome = state
        .session
        .identity()
        .cloned()
        .ok_or(AppError::Unauthorized);
    let user = reported(state, outcome)?;

    let export = UserDataExport {
        user,
        ratings: state.ratings.records().to_vec(),
        imported_history: state.history.items().to_vec(),
        privacy_settings: state.privacy.settings(),
        export_date: format_utc_rfc3339(Utc::now()),
    };

    tracing::info!(
        user_id = %export.user.subject_id,
        ratings = export.ratings.len(),
        history = export.imported_history.len(),
        "User data exported"
    );
    state.notifier.success("Data exported successfully");
    Ok(export)
}

// ─── Account Deletion ────────────────────────────────────────

/// Delete the signed-in user's account and all associated data.
///
/// Does nothing unless the UI obtained explicit confirmation. On
/// confirmation:
/// 1. Erase persisted ratings
/// 2. Reset privacy flags and drop imported history
/// 3. Sign out
/// 4. Clear the stored consent record
///
/// Returns whether the account was deleted.
pub fn delete_account(state: &mut EngineState, confirmed: bool) -> Result<bool> {
    let outcome = require_auth(state);
    let user = reported(state, outcome)?;

    if !confirmed {
        tracing::debug!(user_id = %user.user_id, "Account deletion not confirmed");
        return Ok(false);
    }

    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    state.ratings.erase(&user.user_id);
    state.history.clear();
    state.privacy.reset();
    end_session(state);
    state.consent.clear();

    state.notifier.success("Account deleted successfully");
    Ok(true)
}
