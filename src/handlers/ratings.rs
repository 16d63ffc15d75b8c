// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rating entry points.

use chrono::Utc;

use crate::error::Result;
use crate::middleware::{enforce_rate_limit, require_auth};
use crate::models::{RatingRecord, RatingStats};
use crate::services::rate_limit::actions;
use crate::EngineState;

use super::reported;

/// Rate a video for the signed-in user (0 to 10).
pub fn rate_video(state: &mut EngineState, video_id: &str, rating: i64) -> Result<RatingRecord> {
    let user = match require_auth(state) {
        Ok(user) => user,
        Err(err) => {
            state.notifier.warning("Please sign in to rate videos");
            return Err(err);
        }
    };

    let outcome = enforce_rate_limit(state, actions::RATING);
    reported(state, outcome)?;

    let outcome = state
        .ratings
        .upsert(&user.user_id, video_id, rating, &state.tokens, Utc::now());
    let record = reported(state, outcome)?;

    state.notifier.success("Rating saved successfully!");
    Ok(record)
}

/// Current rating of a video by the signed-in user.
pub fn get_rating(state: &EngineState, video_id: &str) -> Option<u8> {
    let user = require_auth(state).ok()?;
    state.ratings.get_rating(&user.user_id, video_id)
}

/// The signed-in user's ratings, newest first, with summary stats.
pub fn list_ratings(state: &mut EngineState) -> Result<(Vec<RatingRecord>, RatingStats)> {
    let outcome = require_auth(state);
    reported(state, outcome)?;

    let records = state.ratings.recent_first().into_iter().cloned().collect();
    Ok((records, state.ratings.stats()))
}

/// Delete every rating of the signed-in user.
///
/// Does nothing unless the UI obtained explicit confirmation. Returns the
/// number of ratings removed.
pub fn delete_all_ratings(state: &mut EngineState, confirmed: bool) -> Result<usize> {
    let outcome = require_auth(state);
    let user = reported(state, outcome)?;

    if !confirmed {
        tracing::debug!(user_id = %user.user_id, "Delete all ratings not confirmed");
        return Ok(0);
    }

    let outcome = state.ratings.delete_all(&user.user_id, Utc::now());
    let removed = reported(state, outcome)?;

    state.notifier.success("All ratings deleted");
    Ok(removed)
}
