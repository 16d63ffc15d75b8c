// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consent gate.

use chrono::Utc;

use crate::error::Result;
use crate::models::ConsentRecord;
use crate::time_utils::format_utc_rfc3339;
use crate::EngineState;

use super::reported;

const ESSENTIAL_REQUIRED: &str = "You must accept essential functionality to use this app.";

/// Whether a valid consent record exists. Stored settings are applied to the
/// privacy flags; `false` means the UI must show the consent prompt.
pub fn check_consent_status(state: &mut EngineState) -> bool {
    match state.consent.load() {
        Some(record) => {
            state.privacy.apply_consent(&record);
            true
        }
        None => false,
    }
}

/// Record consent. `essential` must be checked; nothing is stored otherwise.
pub fn accept_consent(
    state: &mut EngineState,
    essential: bool,
    analytics: bool,
) -> Result<ConsentRecord> {
    let outcome = ConsentRecord::accept(essential, analytics, format_utc_rfc3339(Utc::now()));
    let record = reported(state, outcome)?;

    state.consent.save(&record);
    state.privacy.apply_consent(&record);
    tracing::info!(analytics, "Consent recorded");

    state
        .notifier
        .success("Privacy preferences saved successfully!");
    Ok(record)
}

/// Decline leaves the gate open and stores nothing.
pub fn decline_consent(state: &mut EngineState) {
    tracing::info!("Consent declined");
    state.notifier.warning(ESSENTIAL_REQUIRED);
}
