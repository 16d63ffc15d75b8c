//! Imported watch-history model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A watched video taken from an imported history export or URL list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImportedHistoryItem {
    /// Value of the `v=` query parameter
    pub video_id: String,
    /// Sanitized title, or a placeholder
    pub title: String,
    pub source_url: String,
    /// When it was watched (ISO 8601); import time when the source has none
    pub watched_at: String,
}
