// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User data export document.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::{Identity, ImportedHistoryItem, PrivacySettings, RatingRecord};

/// Full snapshot of a user's data, offered as a downloadable JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserDataExport {
    pub user: Identity,
    pub ratings: Vec<RatingRecord>,
    pub imported_history: Vec<ImportedHistoryItem>,
    pub privacy_settings: PrivacySettings,
    /// When the export was produced (ISO 8601)
    pub export_date: String,
}

impl UserDataExport {
    /// Download file name, e.g. `videoRate-data-2024-05-01.json`.
    pub fn file_name(&self) -> String {
        let date = self.export_date.get(..10).unwrap_or("export");
        format!("videoRate-data-{date}.json")
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Export serialization failed: {e}")))
    }
}
