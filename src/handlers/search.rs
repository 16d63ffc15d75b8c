//! Search gate.
//!
//! Catalog search itself belongs to the UI; the engine only meters it and
//! cleans the query.

use crate::error::Result;
use crate::middleware::enforce_rate_limit;
use crate::services::history::sanitize_input;
use crate::services::rate_limit::actions;
use crate::EngineState;

use super::reported;

const MAX_QUERY_CHARS: usize = 100;

/// Consume one search from the caller's quota and return the normalized
/// (sanitized, lowercased) query. Signed-out callers share one quota.
pub fn authorize_search(state: &mut EngineState, raw_query: &str) -> Result<String> {
    let outcome = enforce_rate_limit(state, actions::SEARCH);
    reported(state, outcome)?;

    Ok(sanitize_input(raw_query, MAX_QUERY_CHARS).to_lowercase())
}
