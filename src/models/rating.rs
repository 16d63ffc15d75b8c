//! Rating records owned by the rating store.

use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Source tag for ratings entered through the rating dialog.
pub const SOURCE_MANUAL_SEARCH: &str = "manual_search";

/// A single video rating. At most one exists per `(user_id, video_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RatingRecord {
    /// Assigned on first rating and kept across updates
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    /// 0 to 10 inclusive
    pub rating: u8,
    /// Last time the rating was set (ISO 8601)
    pub timestamp: String,
    pub source: String,
}

/// Rating input as received from the UI, validated before it reaches the store.
#[derive(Debug, Validate)]
pub struct RatingRequest {
    #[validate(length(min = 1, max = 64))]
    pub video_id: String,
    #[validate(range(min = 0, max = 10))]
    pub rating: i64,
}

/// Aggregate shown on the ratings tab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingStats {
    pub total: usize,
    /// Mean rating, 0.0 when there are no ratings
    pub average: f64,
}

impl RatingStats {
    pub fn from_records(records: &[RatingRecord]) -> Self {
        let total = records.len();
        let average = if total > 0 {
            records.iter().map(|r| f64::from(r.rating)).sum::<f64>() / total as f64
        } else {
            0.0
        };
        Self { total, average }
    }
}
