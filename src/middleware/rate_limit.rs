//! Rate-limit guard.

use std::time::Instant;

use crate::error::AppError;
use crate::services::rate_limit::ANONYMOUS_ACTOR;
use crate::EngineState;

/// Consume one unit of `action` quota for the current actor.
///
/// The actor is the signed-in subject, or the shared anonymous bucket.
/// Buckets whose window has closed are pruned on every call.
pub fn enforce_rate_limit(state: &EngineState, action: &str) -> Result<(), AppError> {
    let actor = state.session.identity().map(|i| i.subject_id.as_str());
    let now = Instant::now();

    let purged = state.rate_limiter.purge_expired(now);
    if purged > 0 {
        tracing::debug!(purged, "Pruned expired rate-limit buckets");
    }

    if state.rate_limiter.check_and_consume_at(action, actor, now) {
        tracing::debug!(
            action,
            actor = actor.unwrap_or(ANONYMOUS_ACTOR),
            remaining = state.rate_limiter.remaining(action, actor, now),
            "Rate limit consumed"
        );
        Ok(())
    } else {
        tracing::warn!(action, actor = actor.unwrap_or(ANONYMOUS_ACTOR), "Rate limit exceeded");
        Err(AppError::RateLimited {
            action: action.to_string(),
        })
    }
}
